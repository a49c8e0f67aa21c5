//! sesame-http - HTTP client wrapper and REST repositories.
//!
//! [`HttpClient`] resolves endpoints against the configured API base and
//! passes failures through untouched. [`AuthRepository`] and
//! [`UserRepository`] map semantic operations onto fixed endpoints.

mod auth;
mod client;
mod endpoints;
mod users;

pub use auth::AuthRepository;
pub use client::{HttpClient, HttpConfig, RequestOptions};
pub use users::{NewUser, UserPatch, UserRecord, UserRepository};
