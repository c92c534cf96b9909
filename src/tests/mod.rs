mod user_tests;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::handlers::AppState;
use crate::auth::jwt::TokenService;
use crate::core::domain::UserChanges;
use crate::core::errors::UserServiceError;
use crate::core::interactors::users::CreateUserInput;
use crate::repository::in_memory::InMemoryUserRepository;
use crate::repository::{UserRecord, UserRepository};

pub const TEST_SECRET: &str = "test-secret";

pub fn create_test_state() -> AppState<InMemoryUserRepository> {
    let repository = Arc::new(InMemoryUserRepository::new());
    let tokens = TokenService::new(TEST_SECRET.to_string());
    AppState::new(repository, tokens, chrono::Duration::minutes(15))
}

pub fn sample_input(name: &str, email: &str) -> CreateUserInput {
    CreateUserInput {
        name: name.to_string(),
        password: "password1".to_string(),
        email: email.to_string(),
    }
}

/// Test double simulating the narrow race where a write lands in the store
/// but the verification re-read comes back empty.
pub struct FlakyRepository {
    inner: InMemoryUserRepository,
    pub fail_create_fetch: bool,
    pub fail_update_fetch: bool,
}

impl FlakyRepository {
    pub fn new() -> Self {
        FlakyRepository {
            inner: InMemoryUserRepository::new(),
            fail_create_fetch: false,
            fail_update_fetch: false,
        }
    }
}

#[async_trait]
impl UserRepository for FlakyRepository {
    async fn find_all(&self) -> Result<Vec<UserRecord>, UserServiceError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<UserRecord, UserServiceError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<UserRecord, UserServiceError> {
        self.inner.find_by_name(name).await
    }

    async fn create(
        &self,
        name: &str,
        password_digest: &str,
        email: &str,
    ) -> Result<UserRecord, UserServiceError> {
        let record = self.inner.create(name, password_digest, email).await?;
        if self.fail_create_fetch {
            return Err(UserServiceError::UnverifiedWrite("created".to_string()));
        }
        Ok(record)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<UserRecord, UserServiceError> {
        let record = self.inner.update(id, changes).await?;
        if self.fail_update_fetch {
            return Err(UserServiceError::UnverifiedWrite("updated".to_string()));
        }
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<UserRecord, UserServiceError> {
        self.inner.delete(id).await
    }
}
