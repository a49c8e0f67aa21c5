//! Session provider: binds the view-model, the guard and the navigator.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cache::CacheKey;
use crate::guard::{GuardOutcome, Navigator, RouteGuard};
use crate::state::AuthState;
use crate::view_model::AuthViewModel;

/// Owns the session for an application.
///
/// The provider is created once and handed to whatever needs the session.
/// It re-evaluates the [`RouteGuard`] whenever the cache changes and applies
/// the redirects the guard asks for.
pub struct AuthProvider {
    view_model: Arc<AuthViewModel>,
    navigator: Arc<dyn Navigator>,
    guard: Mutex<RouteGuard>,
}

impl AuthProvider {
    pub fn new(view_model: Arc<AuthViewModel>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            view_model,
            navigator,
            guard: Mutex::new(RouteGuard::new()),
        }
    }

    pub fn view_model(&self) -> &Arc<AuthViewModel> {
        &self.view_model
    }

    pub fn auth(&self) -> AuthState {
        self.view_model.auth_state()
    }

    /// Evaluate the guard against the current state and route, issuing any
    /// redirect through the navigator.
    pub fn sync(&self) -> GuardOutcome {
        let state = self.view_model.auth_state();
        let current = self.navigator.current();
        let outcome = self
            .guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .evaluate(&state, current);

        if let Some(route) = outcome.redirect {
            self.navigator.replace(route);
        }
        trace!(phase = %outcome.phase, render = ?outcome.render, "Guard evaluated");
        outcome
    }

    /// Load the session and settle the guard on it.
    pub async fn start(&self) -> GuardOutcome {
        self.sync();
        self.view_model.revalidate().await;
        self.sync()
    }

    /// React to cache changes. Never returns while the provider is alive;
    /// abort the task to stop it.
    ///
    /// Invalidated session reads are refetched, then the guard is
    /// re-evaluated. A refetch that fails leaves the reads invalidated and is
    /// retried on the next cache change.
    pub async fn run(&self) {
        let mut changes = self.view_model.cache().subscribe();
        self.sync();
        while changes.changed().await.is_ok() {
            while self.session_invalidated() {
                debug!("Session invalidated, revalidating");
                let settled = self.view_model.revalidate().await;
                // Ticks raised by our own refetch are not new changes.
                changes.borrow_and_update();
                if !settled {
                    break;
                }
            }
            self.sync();
        }
    }

    fn session_invalidated(&self) -> bool {
        let cache = self.view_model.cache();
        cache.needs_refetch(CacheKey::Session) || cache.needs_refetch(CacheKey::CurrentUser)
    }

    /// Run [`AuthProvider::run`] on the tokio runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("view_model", &self.view_model)
            .finish_non_exhaustive()
    }
}
