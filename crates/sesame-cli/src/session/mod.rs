//! Per-invocation session wiring.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;

use sesame_app::{AuthViewModel, QueryCache, UsersViewModel};
use sesame_core::{ApiUrl, CredentialStore, Environment};
use sesame_http::{HttpClient, HttpConfig, UserRepository};
use sesame_store::FileCredentialStore;

use crate::output::ConsoleNotifier;

/// Everything a command needs to reach the backend and the stored session.
#[derive(Debug, Clone)]
pub struct Context {
    pub env: Environment,
    pub store: FileCredentialStore,
}

impl Context {
    /// Read the environment; an explicit `--api-base` wins over it.
    pub fn new(api_base: Option<&str>) -> Result<Self> {
        let mut env = Environment::from_env().context("Invalid SESAME_* environment")?;
        if let Some(base) = api_base {
            env.api_base = ApiUrl::new(base).context("Invalid API base URL")?;
        }

        let store = storage::store()?;
        debug!(api_base = %env.api_base, session = %store.path().display(), "Environment loaded");

        Ok(Self { env, store })
    }

    pub fn auth(&self) -> Result<Arc<AuthViewModel>> {
        let view_model = AuthViewModel::from_environment(&self.env, Arc::new(self.store.clone()))
            .context("Failed to build HTTP client")?
            .with_notifier(Arc::new(ConsoleNotifier));
        Ok(Arc::new(view_model))
    }

    /// Directory view-model, authenticated with the stored token when there
    /// is one.
    pub async fn users(&self) -> Result<UsersViewModel> {
        let http = HttpClient::with_config(HttpConfig::from(&self.env))
            .context("Failed to build HTTP client")?;
        let mut repo = UserRepository::new(http, self.env.endpoints.users.clone());

        if let Some(user) = self.store.load().await.context("Failed to load session")? {
            repo = repo.with_token(user.token);
        }

        Ok(UsersViewModel::new(repo, QueryCache::new(self.env.stale_time))
            .with_notifier(Arc::new(ConsoleNotifier)))
    }
}
