//! Request and response bodies of the authentication endpoints.

use serde::{Deserialize, Serialize};

use sesame_core::error::TransportError;
use sesame_core::{AccessToken, RefreshToken, Result, User};

/// Request body for login.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for token refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Request body for a password reset request.
#[derive(Debug, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub username: &'a str,
}

/// The `user` object inside an authentication response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserPayload {
    pub id: serde_json::Value,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Response from login and registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub user: UserPayload,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AuthResponse {
    /// Flatten the response into a [`User`].
    ///
    /// Top-level tokens take precedence over the ones nested in `user`.
    pub fn into_user(self) -> Result<User> {
        let token = self
            .token
            .or(self.user.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TransportError::Decode {
                message: "authentication response carried no token".to_string(),
            })?;

        let id = match self.user.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Ok(User {
            id,
            name: self.user.name,
            email: self.user.email,
            token: AccessToken::new(token),
            refresh_token: self
                .refresh_token
                .or(self.user.refresh_token)
                .map(RefreshToken::new),
        })
    }
}

/// Response from token refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
