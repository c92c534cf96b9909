use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use crate::core::errors::UserServiceError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Stringified user id
    pub exp: usize,  // Absolute expiry, seconds since epoch
}

/// Issues and resolves signed bearer tokens.
///
/// Tokens are stateless: validity is fully determined by the signature and
/// the `exp` claim at verification time. There is no revocation list, so a
/// token stays valid for its full TTL even across account deletion or a
/// password change.
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: String) -> Self {
        TokenService { secret }
    }

    /// Embed `subject` and an absolute expiry (`now + ttl`) into a signed
    /// payload. Fails only on encoding errors, which are not expected in
    /// normal operation.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, UserServiceError> {
        let expire = Utc::now() + ttl;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expire.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| UserServiceError::Internal(format!("JWT encoding error: {}", e)))
    }

    /// Verify a token and return its subject. Expired tokens and tokens
    /// whose signature or payload does not check out are separable kinds,
    /// though callers may treat both as "unauthenticated".
    pub fn resolve(&self, token: &str) -> Result<String, UserServiceError> {
        // No leeway: the expiry claim is exact.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => UserServiceError::TokenExpired,
            _ => UserServiceError::TokenInvalid(e.to_string()),
        })?;

        Ok(token_data.claims.sub)
    }
}
