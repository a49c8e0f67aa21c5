//! Process environment configuration.
//!
//! Settings are read once at start-up from `SESAME_*` variables; there is no
//! runtime override surface.

use std::time::Duration;

use crate::error::{Error, InvalidInputError};
use crate::types::ApiUrl;

/// Default API base when `SESAME_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default age after which cached reads are refetched.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Paths of the authentication endpoints, relative to the API base.
///
/// Deployments disagree on some of these (registration in particular), so
/// each one can be overridden with `SESAME_ENDPOINT_<NAME>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub login: String,
    pub register: String,
    pub refresh: String,
    pub logout: String,
    pub forgot_password: String,
    pub users: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            login: "seguridad/login/".to_string(),
            register: "seguridad/usuario/nuevo/".to_string(),
            refresh: "seguridad/refresh/".to_string(),
            logout: "seguridad/logout/".to_string(),
            forgot_password: "seguridad/usuario/cambio-clave-solicitar/".to_string(),
            users: "users".to_string(),
        }
    }
}

/// Runtime environment for a sesame client.
#[derive(Debug, Clone)]
pub struct Environment {
    pub api_base: ApiUrl,
    pub timeout: Duration,
    pub stale_time: Duration,
    pub endpoints: AuthEndpoints,
}

impl Environment {
    /// Build an environment with defaults for everything but the base URL.
    pub fn new(api_base: ApiUrl) -> Self {
        Self {
            api_base,
            timeout: DEFAULT_TIMEOUT,
            stale_time: DEFAULT_STALE_TIME,
            endpoints: AuthEndpoints::default(),
        }
    }

    /// Read the environment from process variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the environment through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = match lookup("SESAME_API_BASE") {
            Some(value) => ApiUrl::new(value)?,
            None => ApiUrl::new(DEFAULT_API_BASE)?,
        };

        let mut env = Self::new(api_base);

        if let Some(ms) = lookup("SESAME_TIMEOUT_MS") {
            env.timeout = Duration::from_millis(parse_number("SESAME_TIMEOUT_MS", &ms)?);
        }
        if let Some(secs) = lookup("SESAME_STALE_SECS") {
            env.stale_time = Duration::from_secs(parse_number("SESAME_STALE_SECS", &secs)?);
        }

        let endpoints = &mut env.endpoints;
        for (key, slot) in [
            ("SESAME_ENDPOINT_LOGIN", &mut endpoints.login),
            ("SESAME_ENDPOINT_REGISTER", &mut endpoints.register),
            ("SESAME_ENDPOINT_REFRESH", &mut endpoints.refresh),
            ("SESAME_ENDPOINT_LOGOUT", &mut endpoints.logout),
            ("SESAME_ENDPOINT_FORGOT_PASSWORD", &mut endpoints.forgot_password),
            ("SESAME_ENDPOINT_USERS", &mut endpoints.users),
        ] {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        Ok(env)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, Error> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| {
        InvalidInputError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
