//! The authenticated user.

use serde::{Deserialize, Deserializer, Serialize};

use crate::tokens::{AccessToken, RefreshToken};

/// A signed-in user together with the tokens that authenticate them.
///
/// The access token is never empty for a user held by an authenticated
/// session; a refresh replaces both tokens at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
}

impl User {
    /// Returns a copy of this user carrying a new token pair.
    ///
    /// A refresh response without a refresh token keeps the current one.
    pub fn with_tokens(&self, token: AccessToken, refresh_token: Option<RefreshToken>) -> Self {
        Self {
            token,
            refresh_token: refresh_token.or_else(|| self.refresh_token.clone()),
            ..self.clone()
        }
    }
}

/// Some backends send numeric ids; keep them as strings either way.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
