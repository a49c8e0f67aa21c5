//! In-process credential store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sesame_core::{CredentialStore, Result, User};

/// Keeps the signed-in user in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<RwLock<Option<User>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `user`.
    pub fn with_user(user: User) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(user))),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<User>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, user: &User) -> Result<()> {
        *self.slot.write().await = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}
