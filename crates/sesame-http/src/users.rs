//! Directory CRUD repository.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use sesame_core::{AccessToken, Result};

use crate::client::{HttpClient, RequestOptions};

/// A user record as served by the directory endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Body for creating or replacing a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Partial update; unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Repository for the `users` collection.
#[derive(Debug, Clone)]
pub struct UserRepository {
    http: HttpClient,
    endpoint: String,
    token: Option<AccessToken>,
}

impl UserRepository {
    pub fn new(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `token` as a bearer with every request.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    fn options(&self) -> RequestOptions {
        match &self.token {
            Some(token) => RequestOptions::new().bearer(token),
            None => RequestOptions::new(),
        }
    }

    fn item(&self, id: u64) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        let users: Vec<UserRecord> = self.http.get(&self.endpoint, &self.options()).await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<UserRecord> {
        self.http.get(&self.item(id), &self.options()).await
    }

    #[instrument(skip(self, user))]
    pub async fn create(&self, user: &NewUser) -> Result<UserRecord> {
        self.http.post(&self.endpoint, user, &self.options()).await
    }

    #[instrument(skip(self, user))]
    pub async fn update(&self, id: u64, user: &NewUser) -> Result<UserRecord> {
        self.http.put(&self.item(id), user, &self.options()).await
    }

    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: u64, patch: &UserPatch) -> Result<UserRecord> {
        self.http.patch(&self.item(id), patch, &self.options()).await
    }

    /// Delete a record. The response body is ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<()> {
        let _: serde_json::Value = self.http.delete(&self.item(id), &self.options()).await?;
        Ok(())
    }
}
