//! Authentication API trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{AccessToken, Credentials, RefreshToken, Registration, Result, User};

/// Tokens returned by a refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
}

/// The remote authentication endpoints.
///
/// Implementations perform exactly one request per call and return failures
/// as they came off the wire.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an authenticated user.
    async fn login(&self, credentials: &Credentials) -> Result<User>;

    /// Create an account; the response authenticates the new user.
    async fn register(&self, registration: &Registration) -> Result<User>;

    /// Obtain a new token pair from a refresh token.
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair>;

    /// Invalidate the session server-side.
    async fn logout(&self, token: &AccessToken) -> Result<bool>;

    /// Ask the server to start a password reset for `username`.
    async fn forgot_password(&self, username: &str) -> Result<bool>;
}

#[async_trait]
impl<T: AuthApi + ?Sized> AuthApi for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<User> {
        (**self).login(credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<User> {
        (**self).register(registration).await
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        (**self).refresh(refresh_token).await
    }

    async fn logout(&self, token: &AccessToken) -> Result<bool> {
        (**self).logout(token).await
    }

    async fn forgot_password(&self, username: &str) -> Result<bool> {
        (**self).forgot_password(username).await
    }
}
