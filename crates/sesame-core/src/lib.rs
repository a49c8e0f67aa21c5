//! sesame-core - Core types and traits for the sesame session toolkit.
//!
//! Everything the HTTP, storage and view-model crates share lives here:
//! the unified [`Error`], validated [`ApiUrl`]s, login [`Credentials`],
//! the authenticated [`User`] and the [`FormErrors`] map that failed
//! submissions are reported through.

pub mod config;
pub mod credentials;
pub mod error;
pub mod form;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod user;

pub use config::{AuthEndpoints, Environment};
pub use credentials::{Credentials, Registration};
pub use error::Error;
pub use form::FormErrors;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{AuthApi, CredentialStore, TokenPair};
pub use types::ApiUrl;
pub use user::User;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
