//! Account storage seam.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use intervue_core::AppError;

use crate::state::BoxFuture;

use super::model::{User, UserRecord};

/// Account lookups. Emails are stored and matched in normalized (lowercase)
/// form.
pub trait UserDirectory: Send + Sync {
    /// Fails with `Conflict` on `email` if the address is taken.
    fn insert<'a>(&'a self, record: UserRecord) -> BoxFuture<'a, Result<User, AppError>>;

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AppError>>;

    fn find_by_id<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<Option<User>, AppError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl UserDirectory for InMemoryUserDirectory {
    fn insert<'a>(&'a self, record: UserRecord) -> BoxFuture<'a, Result<User, AppError>> {
        Box::pin(async move {
            let mut users = self.users.write().await;

            if users.values().any(|existing| existing.user.email == record.user.email) {
                return Err(AppError::conflict("email"));
            }

            let user = record.user.clone();
            users.insert(user.id, record);
            Ok(user)
        })
    }

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AppError>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users.values().find(|record| record.user.email == email).cloned())
        })
    }

    fn find_by_id<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<Option<User>, AppError>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users.get(&id).map(|record| record.user.clone()))
        })
    }
}
