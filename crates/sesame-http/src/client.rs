//! HTTP client wrapper.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use sesame_core::error::{ApiError, Error, InvalidInputError, TransportError};
use sesame_core::{AccessToken, ApiUrl, Environment, Result};

/// Instance-wide settings for an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base: ApiUrl,
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: HeaderMap,
}

impl HttpConfig {
    pub fn new(base: ApiUrl) -> Self {
        Self {
            base,
            timeout: sesame_core::config::DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
        }
    }
}

impl From<&Environment> for HttpConfig {
    fn from(env: &Environment) -> Self {
        Self {
            base: env.api_base.clone(),
            timeout: env.timeout,
            headers: HeaderMap::new(),
        }
    }
}

/// Per-call overrides. Anything set here wins over the instance defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    timeout: Option<Duration>,
    bearer: Option<AccessToken>,
    params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header for this call only.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            InvalidInputError::Other {
                message: format!("invalid header name '{}': {}", name, e),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Other {
            message: format!("invalid header value: {}", e),
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Authenticate this call with a bearer token.
    pub fn bearer(mut self, token: &AccessToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

/// HTTP client bound to an API base address.
///
/// Every verb resolves its endpoint with [`ApiUrl::join`], sends JSON, and
/// decodes a JSON response. Transport failures and non-2xx responses are
/// returned as-is; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: ApiUrl,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client for `base` with default settings.
    pub fn new(base: ApiUrl) -> Result<Self> {
        Self::with_config(HttpConfig::new(base))
    }

    /// Create a client from explicit settings.
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        let mut headers = config.headers;
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("sesame/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base: config.base,
            timeout: config.timeout,
        })
    }

    /// Returns the API base this client resolves endpoints against.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// Resolve an endpoint to the absolute request URL.
    pub fn build_url(&self, endpoint: &str) -> String {
        self.base.join(endpoint)
    }

    pub async fn get<R>(&self, endpoint: &str, options: &RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::GET, endpoint, None::<&()>, options).await
    }

    pub async fn post<B, R>(&self, endpoint: &str, body: &B, options: &RequestOptions) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body), options).await
    }

    pub async fn put<B, R>(&self, endpoint: &str, body: &B, options: &RequestOptions) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(body), options).await
    }

    pub async fn patch<B, R>(&self, endpoint: &str, body: &B, options: &RequestOptions) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, endpoint, Some(body), options).await
    }

    pub async fn delete<R>(&self, endpoint: &str, options: &RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::DELETE, endpoint, None::<&()>, options).await
    }

    /// DELETE carrying a request body.
    pub async fn delete_with_body<B, R>(
        &self,
        endpoint: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::DELETE, endpoint, Some(body), options).await
    }

    #[instrument(skip(self, body, options), fields(base = %self.base))]
    async fn request<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(endpoint);
        debug!(%method, %url, "HTTP request");
        trace!(params = ?options.params, "query parameters");

        let mut builder = self
            .client
            .request(method, &url)
            .headers(options.headers.clone());

        if !options.params.is_empty() {
            builder = builder.query(&options.params);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(token) = &options.bearer {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(
                |_| InvalidInputError::Other {
                    message: "token contains characters not allowed in a header".to_string(),
                },
            )?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let timeout = options.timeout.unwrap_or(self.timeout);
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        self.handle_response(response, timeout).await
    }

    /// Decode a success body, or surface the status and body of a failure.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: Response,
        timeout: Duration,
    ) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "HTTP response");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        if status.is_success() {
            // An empty body decodes like JSON null so `()` and `Option<T>` work.
            let raw: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            serde_json::from_slice(raw).map_err(|e| {
                TransportError::Decode {
                    message: e.to_string(),
                }
                .into()
            })
        } else {
            let body = serde_json::from_slice(&bytes).ok();
            Err(Error::Api(ApiError::new(status.as_u16(), body)))
        }
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: timeout.as_millis() as u64,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
