use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::jwt::TokenService;
use crate::auth::password::verify_password;
use crate::core::errors::UserServiceError;
use crate::repository::UserRepository;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Login flow: resolve the user by name, compare password digests, mint a
/// bearer token whose subject is the stringified user id.
pub struct AuthInteractor<R: UserRepository> {
    repository: Arc<R>,
    tokens: TokenService,
    token_ttl: Duration,
}

impl<R: UserRepository> AuthInteractor<R> {
    pub fn new(repository: Arc<R>, tokens: TokenService, token_ttl: Duration) -> Self {
        AuthInteractor {
            repository,
            tokens,
            token_ttl,
        }
    }

    /// An unknown username and a wrong password fail with the identical
    /// `InvalidCredentials`; the caller can never tell which it was.
    /// Storage failures other than the missing user propagate unmodified.
    pub async fn handle(&self, username: &str, password: &str) -> Result<Token, UserServiceError> {
        let user = match self.repository.find_by_name(username).await {
            Ok(user) => user,
            Err(UserServiceError::NotFound(_)) => return Err(UserServiceError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        if !verify_password(password, &user.password) {
            return Err(UserServiceError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user.id.to_string(), self.token_ttl)?;
        Ok(Token {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Verify a bearer token and hand back its subject (the stringified
    /// user id). Used by the boundary to resolve the current user.
    pub fn resolve_subject(&self, token: &str) -> Result<String, UserServiceError> {
        self.tokens.resolve(token)
    }
}
