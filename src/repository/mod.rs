use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::domain::UserChanges;
use crate::core::errors::UserServiceError;

/// A persisted user row. `password` holds the one-way digest, never the
/// plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub password: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence contract for the user store.
///
/// Ids are assigned by the store on creation, strictly increasing and never
/// reused after deletion. `name` and `email` are each globally unique;
/// a racing create/update on the same value has exactly one winner and the
/// loser sees `Duplicate`. Every operation releases whatever resource it
/// acquired on every exit path, error paths included.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, `NotFound` when the store holds none.
    async fn find_all(&self) -> Result<Vec<UserRecord>, UserServiceError>;

    /// `NotFound` when the id is absent.
    async fn find_by_id(&self, id: i64) -> Result<UserRecord, UserServiceError>;

    /// Lookup by unique name, used only by the login flow.
    async fn find_by_name(&self, name: &str) -> Result<UserRecord, UserServiceError>;

    /// Insert a new user and return the freshly assigned record including
    /// generated id and timestamps. `Duplicate` on a name or email
    /// collision; `UnverifiedWrite` when the insert succeeded but the
    /// verification re-read found nothing.
    async fn create(
        &self,
        name: &str,
        password_digest: &str,
        email: &str,
    ) -> Result<UserRecord, UserServiceError>;

    /// Apply only the supplied fields and refresh `updated_at`. `NotFound`
    /// when the id does not exist, `Duplicate` on a unique-constraint
    /// violation, `UnverifiedWrite` when the update landed but the re-read
    /// failed.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<UserRecord, UserServiceError>;

    /// Hard delete. Returns the record as it existed immediately before
    /// deletion; `NotFound` when the id does not exist, including on a
    /// second delete of the same id.
    async fn delete(&self, id: i64) -> Result<UserRecord, UserServiceError>;
}

pub mod in_memory;
