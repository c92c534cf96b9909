use serde::Serialize;
use thiserror::Error;

/// Detail payload for validation failures, pointing at the offending field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: String) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description,
        }
    }
}

/// Error vocabulary shared by the repository, the interactors and the HTTP
/// boundary.
///
/// `NotFound` and `UnverifiedWrite` are deliberately distinct kinds: the
/// first means the requested record does not exist, the second means a
/// create/update landed in the store but the verification re-read came back
/// empty. Callers must treat the latter as "accepted but unconfirmed", not
/// as a failure.
#[derive(Error, Debug, Serialize)]
pub enum UserServiceError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User is {0}, but data fetch failed")]
    UnverifiedWrite(String),
    #[error("User or email already exists: {0}")]
    Duplicate(String),
    #[error("Invalid input for field `{}`: {}", .0.field, .0.description)]
    Validation(FieldError),
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Invalid token: {0}")]
    TokenInvalid(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Internal server error: {0}")]
    Internal(String),
}
