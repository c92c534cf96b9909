use std::time::Duration;

use crate::auth::password::digest_password;
use crate::core::errors::UserServiceError;
use crate::core::interactors::users::{UpdateUserInput, UserGetOutput};
use crate::tests::{create_test_state, sample_input};

#[tokio::test]
async fn test_create_user() {
    let state = create_test_state();
    let user = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    assert!(user.id >= 1);
    assert_eq!(user.name, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.created_at, user.updated_at);
    assert_ne!(user.password, "password1");
    assert_eq!(user.password, digest_password("password1"));
}

#[tokio::test]
async fn test_create_duplicate_name() {
    let state = create_test_state();
    state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let result = state.create.handle(sample_input("alice", "other@example.com")).await;
    assert!(matches!(result, Err(UserServiceError::Duplicate(_))));
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let state = create_test_state();
    state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let result = state.create.handle(sample_input("bob", "alice@example.com")).await;
    assert!(matches!(result, Err(UserServiceError::Duplicate(_))));
}

#[tokio::test]
async fn test_create_invalid_fields() {
    let state = create_test_state();

    for (name, password, email) in [
        ("ab", "password1", "a@example.com"),
        ("bad name!", "password1", "a@example.com"),
        ("alice", "short", "a@example.com"),
        ("alice", &"x".repeat(31), "a@example.com"),
        ("alice", "pass word1", "a@example.com"),
        ("alice", "password1", "plainaddress"),
        ("alice", "password1", "a@nodot"),
        ("alice", "password1", "a@@example.com"),
        ("alice", "password1", "a@example."),
        ("alice", "password1", "a b@example.com"),
    ] {
        let input = crate::core::interactors::users::CreateUserInput {
            name: name.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };
        let result = state.create.handle(input).await;
        assert!(
            matches!(result, Err(UserServiceError::Validation(_))),
            "expected validation failure for ({name}, {password}, {email})"
        );
    }
}

#[tokio::test]
async fn test_get_user_roundtrip() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let fetched = state.get.handle(Some(created.id)).await.unwrap();
    assert_eq!(fetched, UserGetOutput::One(created));
}

#[tokio::test]
async fn test_get_absent_user() {
    let state = create_test_state();
    state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let result = state.get.handle(Some(999_999)).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_get_negative_id() {
    let state = create_test_state();
    let result = state.get.handle(Some(-1)).await;
    assert!(matches!(result, Err(UserServiceError::Validation(_))));
}

#[tokio::test]
async fn test_list_users() {
    let state = create_test_state();
    state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();
    state.create.handle(sample_input("bob", "bob@example.com")).await.unwrap();

    // Both the absent id and the zero id select the list branch.
    for id in [None, Some(0)] {
        match state.get.handle(id).await.unwrap() {
            UserGetOutput::Many(users) => {
                assert_eq!(users.len(), 2);
                assert_eq!(users[0].name, "alice");
                assert_eq!(users[1].name, "bob");
            }
            UserGetOutput::One(_) => panic!("expected the list branch"),
        }
    }
}

#[tokio::test]
async fn test_list_users_empty_store() {
    let state = create_test_state();
    let result = state.get.handle(None).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_update_empty_changeset() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let result = state.update.handle(created.id, UpdateUserInput::default()).await;
    assert!(matches!(result, Err(UserServiceError::Validation(_))));
}

#[tokio::test]
async fn test_update_name_only() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    let updated = state
        .update
        .handle(
            created.id,
            UpdateUserInput {
                name: Some("alice2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "alice2");
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.password, created.password);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_update_password_is_hashed() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let updated = state
        .update
        .handle(
            created.id,
            UpdateUserInput {
                password: Some("newpassword1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.password, digest_password("newpassword1"));
}

#[tokio::test]
async fn test_update_duplicate_email() {
    let state = create_test_state();
    state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();
    let bob = state.create.handle(sample_input("bob", "bob@example.com")).await.unwrap();

    let result = state
        .update
        .handle(
            bob.id,
            UpdateUserInput {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(UserServiceError::Duplicate(_))));
}

#[tokio::test]
async fn test_update_absent_user() {
    let state = create_test_state();
    let result = state
        .update
        .handle(
            999_999,
            UpdateUserInput {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_user() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    let snapshot = state.delete.handle(created.id).await.unwrap();
    assert_eq!(snapshot, created);

    let result = state.get.handle(Some(created.id)).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_twice_fails() {
    let state = create_test_state();
    let created = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();

    state.delete.handle(created.id).await.unwrap();
    let result = state.delete.handle(created.id).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_id_not_reused_after_delete() {
    let state = create_test_state();
    let alice = state.create.handle(sample_input("alice", "alice@example.com")).await.unwrap();
    state.delete.handle(alice.id).await.unwrap();

    let bob = state.create.handle(sample_input("bob", "bob@example.com")).await.unwrap();
    assert!(bob.id > alice.id);
}
