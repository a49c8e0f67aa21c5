//! Error types for sesame.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, input validation and storage errors.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The unified error type for sesame operations.
///
/// HTTP failures are carried verbatim: a transport failure becomes
/// [`Error::Transport`] and a non-2xx response becomes [`Error::Api`] with
/// the status code and the decoded response body untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (no stored session, missing refresh token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses from the API.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (bad URL, malformed form input).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors raised on the client side.
#[derive(Debug, Error)]
pub enum AuthError {
    /// There is no persisted session to act on.
    #[error("not logged in")]
    NotLoggedIn,

    /// The stored session has no refresh token.
    #[error("no refresh token available")]
    RefreshTokenMissing,
}

/// A non-2xx response from the API.
///
/// The body is kept exactly as the server sent it (when it was JSON) so that
/// callers can interpret payloads such as `{mensaje, validaciones}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body, if the server sent one.
    pub body: Option<Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Returns the server-provided `mensaje`, if any.
    pub fn message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.get("mensaje"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Returns the `validaciones` object of a 400 response, if present.
    pub fn validations(&self) -> Option<&serde_json::Map<String, Value>> {
        if self.status != 400 {
            return None;
        }
        self.body
            .as_ref()
            .and_then(|b| b.get("validaciones"))
            .and_then(Value::as_object)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(message) = self.message() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A form failed client-side validation.
    #[error("form rejected: {0}")]
    Form(crate::FormErrors),

    /// Invalid configuration value.
    #[error("invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored session could not be (de)serialized.
    #[error("corrupt session data: {0}")]
    Serde(#[from] serde_json::Error),
}
