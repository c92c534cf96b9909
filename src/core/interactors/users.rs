use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::password::digest_password;
use crate::core::domain::{NewUser, UserChanges, UserKey};
use crate::core::errors::{FieldError, UserServiceError};
use crate::repository::{UserRecord, UserRepository};

/// Outward user representation. `password` carries the opaque stored
/// digest; the plaintext never leaves the create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserOutput {
    pub id: i64,
    pub name: String,
    pub password: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserOutput {
    fn from(record: UserRecord) -> Self {
        UserOutput {
            id: record.id,
            name: record.name,
            password: record.password,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserInput {
    pub name: String,
    pub password: String,
    pub email: String,
}

/// Partial-update input. Absent fields are left untouched; an empty string
/// is a present (and invalid) value, not an omission.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Result of the single get entry point: the list branch or the single-user
/// branch, selected by whether a nonzero id was supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum UserGetOutput {
    One(UserOutput),
    Many(Vec<UserOutput>),
}

pub struct UserGetInteractor<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserGetInteractor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        UserGetInteractor { repository }
    }

    /// `Some(id)` with `id >= 1` selects the single-user branch, `None` or
    /// `Some(0)` the list branch. `NotFound` from the repository propagates
    /// unchanged. No side effects.
    pub async fn handle(&self, id: Option<i64>) -> Result<UserGetOutput, UserServiceError> {
        match id {
            None | Some(0) => {
                let users = self.repository.find_all().await?;
                Ok(UserGetOutput::Many(users.into_iter().map(Into::into).collect()))
            }
            Some(id) => {
                let key = UserKey::new(id)?;
                let user = self.repository.find_by_id(key.id).await?;
                Ok(UserGetOutput::One(user.into()))
            }
        }
    }
}

pub struct UserCreateInteractor<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserCreateInteractor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        UserCreateInteractor { repository }
    }

    /// Validate the full shape, hash the password, create, shape the
    /// output. `Duplicate` and `UnverifiedWrite` propagate as distinct
    /// kinds; the latter means the user exists but could not be read back.
    pub async fn handle(&self, input: CreateUserInput) -> Result<UserOutput, UserServiceError> {
        let user = NewUser::new(input.name, input.password, input.email)?;
        let digest = digest_password(&user.password);
        let record = self.repository.create(&user.name, &digest, &user.email).await?;
        Ok(record.into())
    }
}

pub struct UserUpdateInteractor<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserUpdateInteractor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        UserUpdateInteractor { repository }
    }

    /// Build the sparse change-set from the fields the caller actually
    /// supplied, hash the password if present, delegate. An id-only request
    /// is a validation error.
    pub async fn handle(&self, id: i64, input: UpdateUserInput) -> Result<UserOutput, UserServiceError> {
        let key = UserKey::new(id)?;
        let mut changes = UserChanges::new(input.name, input.password, input.email)?;
        if changes.is_empty() {
            return Err(UserServiceError::Validation(FieldError::new(
                "body",
                "Nothing to update",
                "need at least one field to be updated".to_string(),
            )));
        }
        if let Some(password) = changes.password.take() {
            changes.password = Some(digest_password(&password));
        }
        let record = self.repository.update(key.id, changes).await?;
        Ok(record.into())
    }
}

pub struct UserDeleteInteractor<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserDeleteInteractor<R> {
    pub fn new(repository: Arc<R>) -> Self {
        UserDeleteInteractor { repository }
    }

    /// Hard delete; returns the pre-deletion snapshot. A second delete of
    /// the same id fails with `NotFound` rather than silently succeeding.
    pub async fn handle(&self, id: i64) -> Result<UserOutput, UserServiceError> {
        let key = UserKey::new(id)?;
        let record = self.repository.delete(key.id).await?;
        Ok(record.into())
    }
}
