//! sesame-app - Session state for client applications.
//!
//! The layers, leaf to root:
//!
//! - [`SessionController`] talks to the [`AuthApi`](sesame_core::AuthApi)
//!   and keeps the [`CredentialStore`](sesame_core::CredentialStore) in step.
//! - [`QueryCache`] holds cache-backed reads under typed [`CacheKey`]s.
//! - [`AuthViewModel`] and [`UsersViewModel`] expose reads and mutations to
//!   screens and own cache invalidation.
//! - [`RouteGuard`] and [`AuthProvider`] turn session state into navigation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sesame_app::{AuthProvider, AuthViewModel, MemoryNavigator, Route};
//! use sesame_core::{Credentials, Environment};
//!
//! # async fn example(store: Arc<dyn sesame_core::CredentialStore>) -> Result<(), sesame_core::Error> {
//! let env = Environment::from_env()?;
//! let view_model = Arc::new(AuthViewModel::from_environment(&env, store)?);
//! let navigator = Arc::new(MemoryNavigator::new(Route::Home));
//! let provider = AuthProvider::new(view_model.clone(), navigator);
//!
//! provider.start().await;
//! if let Err(errors) = view_model.login(Credentials::new("alice@example.com", "secret123")).await {
//!     eprintln!("{}", errors);
//! }
//! provider.sync();
//! # Ok(())
//! # }
//! ```

mod cache;
mod controller;
mod guard;
mod mutation;
mod notify;
mod provider;
mod state;
mod users;
mod view_model;

pub use cache::{CacheKey, QueryCache, QueryState};
pub use controller::SessionController;
pub use guard::{GuardOutcome, MemoryNavigator, Navigator, Phase, Render, Route, RouteGuard};
pub use mutation::MutationState;
pub use notify::{Notifier, TracingNotifier};
pub use provider::AuthProvider;
pub use state::AuthState;
pub use users::UsersViewModel;
pub use view_model::AuthViewModel;
