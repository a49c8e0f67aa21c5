//! Session controller.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use sesame_core::error::AuthError;
use sesame_core::{AuthApi, CredentialStore, Credentials, Registration, Result, User};

/// Performs authentication calls and keeps the credential store in step.
///
/// Every successful call that yields tokens persists the user; logout
/// clears the store. Failures from the API are returned unchanged.
#[derive(Clone)]
pub struct SessionController {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn CredentialStore>,
}

impl SessionController {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self { api, store }
    }

    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let user = self.api.login(credentials).await?;
        self.store.save(&user).await?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let user = self.api.register(registration).await?;
        self.store.save(&user).await?;
        info!(user_id = %user.id, "Registered");
        Ok(user)
    }

    /// End the session.
    ///
    /// The server is told first when a session is stored. Local credentials
    /// are cleared whatever the server answered, and also when the stored
    /// session cannot be read. Either failure is still returned afterwards.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let outcome = match self.store.load().await {
            Ok(Some(user)) => match self.api.logout(&user.token).await {
                Ok(acknowledged) => {
                    if !acknowledged {
                        warn!("Server refused logout");
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Ok(None) => {
                debug!("No stored session to log out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, clearing it without telling the server");
                Err(e)
            }
        };

        self.store.clear().await?;
        info!("Logged out");
        outcome
    }

    /// Exchange the stored refresh token for new tokens and persist them.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<User> {
        let user = self.store.load().await?.ok_or(AuthError::NotLoggedIn)?;
        let refresh_token = user
            .refresh_token
            .as_ref()
            .ok_or(AuthError::RefreshTokenMissing)?;

        let pair = self.api.refresh(refresh_token).await?;
        let user = user.with_tokens(pair.token, pair.refresh_token);
        self.store.save(&user).await?;
        debug!(user_id = %user.id, "Refreshed tokens");
        Ok(user)
    }

    /// True when a user with a non-empty access token is stored.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self
            .store
            .load()
            .await?
            .is_some_and(|user| !user.token.is_empty()))
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        self.store.load().await
    }

    #[instrument(skip(self))]
    pub async fn forgot_password(&self, username: &str) -> Result<bool> {
        self.api.forgot_password(username).await
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController").finish_non_exhaustive()
    }
}
