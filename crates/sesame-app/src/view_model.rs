//! Authentication view-model.
//!
//! Screens read the session through [`AuthViewModel::auth_state`] and submit
//! forms through its mutations. The view-model owns every cache write for
//! the `Session` and `CurrentUser` keys; navigation is left to the
//! [`AuthProvider`](crate::AuthProvider), which reacts to the resulting cache
//! changes.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use sesame_core::{CredentialStore, Credentials, Environment, FormErrors, Registration, User};
use sesame_http::AuthRepository;

use crate::cache::{CacheKey, QueryCache};
use crate::controller::SessionController;
use crate::mutation::{MutationSlot, MutationState};
use crate::notify::{Notifier, TracingNotifier};
use crate::state::AuthState;

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const LOGOUT_FAILED: &str = "Logout failed";
const REFRESH_FAILED: &str = "Session refresh failed";
const FORGOT_FAILED: &str = "Password reset request failed";

pub struct AuthViewModel {
    controller: SessionController,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
    login: MutationSlot,
    register: MutationSlot,
    logout: MutationSlot,
    refresh: MutationSlot,
}

impl AuthViewModel {
    pub fn new(controller: SessionController, cache: QueryCache) -> Self {
        Self {
            controller,
            cache,
            notifier: Arc::new(TracingNotifier),
            login: MutationSlot::default(),
            register: MutationSlot::default(),
            logout: MutationSlot::default(),
            refresh: MutationSlot::default(),
        }
    }

    /// Wire a view-model to the REST API described by `env`.
    pub fn from_environment(
        env: &Environment,
        store: Arc<dyn CredentialStore>,
    ) -> sesame_core::Result<Self> {
        let api = AuthRepository::from_environment(env)?;
        let controller = SessionController::new(Arc::new(api), store);
        Ok(Self::new(controller, QueryCache::new(env.stale_time)))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// The cache this view-model writes to. Clones share entries.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Whether a session is stored, served from cache while fresh.
    pub async fn auth_status(&self) -> sesame_core::Result<bool> {
        self.cache
            .fetch(CacheKey::Session, || self.controller.is_authenticated())
            .await
    }

    /// The stored user, served from cache while fresh.
    pub async fn current_user(&self) -> sesame_core::Result<Option<User>> {
        self.cache
            .fetch(CacheKey::CurrentUser, || self.controller.current_user())
            .await
    }

    /// Run both session reads. Failures are recorded in the cache.
    ///
    /// Returns `true` when both reads succeeded.
    pub async fn revalidate(&self) -> bool {
        let (status, user) = tokio::join!(self.auth_status(), self.current_user());
        if let Err(e) = &status {
            warn!(error = %e, "Session status read failed");
        }
        if let Err(e) = &user {
            warn!(error = %e, "Current user read failed");
        }
        status.is_ok() && user.is_ok()
    }

    /// Snapshot of the session for screens and the route guard.
    pub fn auth_state(&self) -> AuthState {
        let session = self.cache.state::<bool>(CacheKey::Session);
        let user = self.cache.state::<Option<User>>(CacheKey::CurrentUser);

        let loading = session.is_fetching
            || session.is_pending
            || user.is_fetching
            || user.is_pending;

        AuthState::new(
            session.data.unwrap_or(false),
            user.data.flatten(),
            loading,
            self.login.snapshot().error,
        )
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Sign in. On success both session reads are invalidated so the next
    /// read picks up the stored user.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: Credentials) -> Result<User, FormErrors> {
        let ticket = self.login.try_begin()?;
        if let Err(errors) = credentials.validate() {
            ticket.fail(errors.clone());
            return Err(errors);
        }

        match self.controller.login(&credentials).await {
            Ok(user) => {
                self.invalidate_session();
                self.notifier.success("Signed in successfully");
                ticket.succeed();
                Ok(user)
            }
            Err(e) => {
                let errors = self.failed(&e, LOGIN_FAILED);
                ticket.fail(errors.clone());
                Err(errors)
            }
        }
    }

    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: Registration) -> Result<User, FormErrors> {
        let ticket = self.register.try_begin()?;
        if let Err(errors) = registration.validate() {
            ticket.fail(errors.clone());
            return Err(errors);
        }

        match self.controller.register(&registration).await {
            Ok(user) => {
                self.invalidate_session();
                ticket.succeed();
                Ok(user)
            }
            Err(e) => {
                let errors = self.failed(&e, REGISTER_FAILED);
                ticket.fail(errors.clone());
                Err(errors)
            }
        }
    }

    /// Sign out.
    ///
    /// The cache shows the signed-out state as soon as this returns, whether
    /// or not the server accepted the logout.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), FormErrors> {
        let ticket = self.logout.try_begin()?;
        let result = self.controller.logout().await;

        self.invalidate_session();
        self.cache.set_data(CacheKey::Session, false);
        self.cache.set_data(CacheKey::CurrentUser, None::<User>);

        match result {
            Ok(()) => {
                ticket.succeed();
                Ok(())
            }
            Err(e) => {
                let errors = self.failed(&e, LOGOUT_FAILED);
                ticket.fail(errors.clone());
                Err(errors)
            }
        }
    }

    /// Trade the stored refresh token for new tokens.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<User, FormErrors> {
        let ticket = self.refresh.try_begin()?;
        match self.controller.refresh().await {
            Ok(user) => {
                self.cache.set_data(CacheKey::CurrentUser, Some(user.clone()));
                self.cache.invalidate(CacheKey::Session);
                ticket.succeed();
                Ok(user)
            }
            Err(e) => {
                let errors = self.failed(&e, REFRESH_FAILED);
                ticket.fail(errors.clone());
                Err(errors)
            }
        }
    }

    /// Ask the server to send password reset instructions to `username`.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, username: &str) -> Result<bool, FormErrors> {
        if username.trim().is_empty() {
            let mut errors = FormErrors::new();
            errors.insert("username", "username is required");
            return Err(errors);
        }

        match self.controller.forgot_password(username.trim()).await {
            Ok(accepted) => {
                if accepted {
                    self.notifier.success("Password reset instructions sent");
                }
                Ok(accepted)
            }
            Err(e) => Err(self.failed(&e, FORGOT_FAILED)),
        }
    }

    pub fn login_state(&self) -> MutationState {
        self.login.snapshot()
    }

    pub fn register_state(&self) -> MutationState {
        self.register.snapshot()
    }

    pub fn logout_state(&self) -> MutationState {
        self.logout.snapshot()
    }

    pub fn refresh_state(&self) -> MutationState {
        self.refresh.snapshot()
    }

    /// Forget the errors of the login and register forms.
    pub fn clear_errors(&self) {
        self.login.clear_errors();
        self.register.clear_errors();
    }

    fn invalidate_session(&self) {
        self.cache.invalidate(CacheKey::Session);
        self.cache.invalidate(CacheKey::CurrentUser);
    }

    fn failed(&self, err: &sesame_core::Error, fallback: &str) -> FormErrors {
        let errors = FormErrors::from_error(err, fallback);
        warn!(error = %err, "{}", fallback);
        self.notifier.error(errors.general().unwrap_or(fallback));
        debug!(fields = errors.len(), "Mapped failure to form errors");
        errors
    }
}

impl std::fmt::Debug for AuthViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthViewModel")
            .field("cache", &self.cache)
            .field("login", &self.login)
            .field("register", &self.register)
            .finish_non_exhaustive()
    }
}
