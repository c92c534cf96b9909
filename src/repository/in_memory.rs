use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::core::domain::UserChanges;
use crate::core::errors::UserServiceError;
use crate::repository::{UserRecord, UserRepository};

#[derive(Default)]
struct Inner {
    users: HashMap<i64, UserRecord>,
    ids_by_name: HashMap<String, i64>,
    ids_by_email: HashMap<String, i64>,
    next_id: i64,
}

impl Inner {
    fn duplicate_key(&self, name: Option<&str>, email: Option<&str>, excluding: Option<i64>) -> bool {
        let taken = |id: Option<&i64>| id.is_some_and(|id| Some(*id) != excluding);
        name.is_some_and(|n| taken(self.ids_by_name.get(n)))
            || email.is_some_and(|e| taken(self.ids_by_email.get(e)))
    }
}

/// In-process user store keeping the whole table behind one `RwLock` so
/// uniqueness checks and the write they guard are atomic. Ids count up from
/// 1 and are never handed out twice, deletions included.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<UserRecord>, UserServiceError> {
        let inner = self.inner.read().await;
        if inner.users.is_empty() {
            return Err(UserServiceError::NotFound("users are not found".to_string()));
        }
        let mut users: Vec<UserRecord> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<UserRecord, UserServiceError> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| UserServiceError::NotFound(format!("id={}", id)))
    }

    async fn find_by_name(&self, name: &str) -> Result<UserRecord, UserServiceError> {
        let inner = self.inner.read().await;
        inner
            .ids_by_name
            .get(name)
            .and_then(|id| inner.users.get(id))
            .cloned()
            .ok_or_else(|| UserServiceError::NotFound(format!("name={}", name)))
    }

    async fn create(
        &self,
        name: &str,
        password_digest: &str,
        email: &str,
    ) -> Result<UserRecord, UserServiceError> {
        let mut inner = self.inner.write().await;
        if inner.duplicate_key(Some(name), Some(email), None) {
            return Err(UserServiceError::Duplicate(format!(
                "name: {} or email: {}",
                name, email
            )));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = UserRecord {
            id: inner.next_id,
            name: name.to_string(),
            password: password_digest.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };

        inner.ids_by_name.insert(record.name.clone(), record.id);
        inner.ids_by_email.insert(record.email.clone(), record.id);
        inner.users.insert(record.id, record.clone());
        debug!(id = record.id, name = %record.name, "user created");
        Ok(record)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<UserRecord, UserServiceError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Err(UserServiceError::NotFound(format!("id={}", id)));
        }
        if inner.duplicate_key(changes.name.as_deref(), changes.email.as_deref(), Some(id)) {
            return Err(UserServiceError::Duplicate(format!(
                "name: {} or email: {}",
                changes.name.as_deref().unwrap_or("<unchanged>"),
                changes.email.as_deref().unwrap_or("<unchanged>")
            )));
        }

        let mut old_name = String::new();
        let mut old_email = String::new();
        if let Some(record) = inner.users.get_mut(&id) {
            old_name = record.name.clone();
            old_email = record.email.clone();
            if let Some(name) = changes.name {
                record.name = name;
            }
            if let Some(password) = changes.password {
                record.password = password;
            }
            if let Some(email) = changes.email {
                record.email = email;
            }
            record.updated_at = Utc::now();
        }

        // Verification re-read; an empty result here means the write landed
        // but cannot be confirmed back to the caller.
        let record = inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| UserServiceError::UnverifiedWrite("updated".to_string()))?;
        if record.name != old_name {
            inner.ids_by_name.remove(&old_name);
            inner.ids_by_name.insert(record.name.clone(), id);
        }
        if record.email != old_email {
            inner.ids_by_email.remove(&old_email);
            inner.ids_by_email.insert(record.email.clone(), id);
        }
        debug!(id, "user updated");
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<UserRecord, UserServiceError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .users
            .remove(&id)
            .ok_or_else(|| UserServiceError::NotFound(format!("id={}", id)))?;
        inner.ids_by_name.remove(&record.name);
        inner.ids_by_email.remove(&record.email);
        debug!(id, "user deleted");
        Ok(record)
    }
}
