//! Durable credential storage trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Result, User};

/// Durable storage for the signed-in user and their tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the persisted user, if any.
    async fn load(&self) -> Result<Option<User>>;

    /// Persist `user`, replacing whatever was stored.
    async fn save(&self, user: &User) -> Result<()>;

    /// Forget the persisted user. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    async fn load(&self) -> Result<Option<User>> {
        (**self).load().await
    }

    async fn save(&self, user: &User) -> Result<()> {
        (**self).save(user).await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }
}
