//! Authentication repository.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use sesame_core::{
    AccessToken, AuthApi, AuthEndpoints, Credentials, Environment, RefreshToken, Registration,
    Result, TokenPair, User,
};

use crate::client::{HttpClient, HttpConfig, RequestOptions};
use crate::endpoints::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RefreshRequest, RefreshResponse,
    RegisterRequest,
};

/// REST implementation of [`AuthApi`].
#[derive(Debug, Clone)]
pub struct AuthRepository {
    http: HttpClient,
    endpoints: AuthEndpoints,
}

impl AuthRepository {
    /// Create a repository using the default endpoint paths.
    pub fn new(http: HttpClient) -> Self {
        Self::with_endpoints(http, AuthEndpoints::default())
    }

    pub fn with_endpoints(http: HttpClient, endpoints: AuthEndpoints) -> Self {
        Self { http, endpoints }
    }

    /// Build the HTTP client and repository from the process environment.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let http = HttpClient::with_config(HttpConfig::from(env))?;
        Ok(Self::with_endpoints(http, env.endpoints.clone()))
    }
}

/// Servers answer logout and reset requests with a bare boolean, an empty
/// body, or an object; only an explicit `false` counts as a refusal.
fn acknowledged(value: Value) -> bool {
    !matches!(value, Value::Bool(false))
}

#[async_trait]
impl AuthApi for AuthRepository {
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    async fn login(&self, credentials: &Credentials) -> Result<User> {
        let request = LoginRequest {
            email: credentials.identifier(),
            password: credentials.password(),
        };

        let response: AuthResponse = self
            .http
            .post(&self.endpoints.login, &request, &RequestOptions::new())
            .await?;

        let user = response.into_user()?;
        debug!(user_id = %user.id, "Login accepted");
        Ok(user)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    async fn register(&self, registration: &Registration) -> Result<User> {
        let request = RegisterRequest {
            name: registration.name(),
            email: registration.email(),
            password: registration.password(),
        };

        let response: AuthResponse = self
            .http
            .post(&self.endpoints.register, &request, &RequestOptions::new())
            .await?;

        let user = response.into_user()?;
        debug!(user_id = %user.id, "Registration accepted");
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        let request = RefreshRequest {
            refresh_token: refresh_token.as_str(),
        };

        let response: RefreshResponse = self
            .http
            .post(&self.endpoints.refresh, &request, &RequestOptions::new())
            .await?;

        Ok(TokenPair {
            token: AccessToken::new(response.token),
            refresh_token: response.refresh_token.map(RefreshToken::new),
        })
    }

    #[instrument(skip_all)]
    async fn logout(&self, token: &AccessToken) -> Result<bool> {
        let options = RequestOptions::new().bearer(token);
        let response: Value = self
            .http
            .post(&self.endpoints.logout, &serde_json::json!({}), &options)
            .await?;
        Ok(acknowledged(response))
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, username: &str) -> Result<bool> {
        let request = ForgotPasswordRequest { username };
        let response: Value = self
            .http
            .post(&self.endpoints.forgot_password, &request, &RequestOptions::new())
            .await?;
        Ok(acknowledged(response))
    }
}
