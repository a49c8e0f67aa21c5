//! Core traits for the repository and credential storage seams.

mod auth_api;
mod credential_store;

pub use auth_api::{AuthApi, TokenPair};
pub use credential_store::CredentialStore;
