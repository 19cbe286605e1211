//! API key credential
//!
//! The API authenticates by an `api_key` field inside every JSON request
//! body rather than by a header.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Environment variable read by [`ApiKeyCredential::from_env`]
pub const API_KEY_ENV: &str = "WEBINARJAM_API_KEY";

/// Body field that carries the key
pub const API_KEY_FIELD: &str = "api_key";

/// Operator-supplied API key. Read on every call, never mutated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCredential {
    #[serde(alias = "api_key")]
    api_key: String,
}

impl ApiKeyCredential {
    /// Create a credential from a raw key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the key from `WEBINARJAM_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(API_KEY_ENV)
    }

    /// Read the key from the named environment variable
    pub fn from_env_var(name: &str) -> Result<Self> {
        match std::env::var(name) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(Error::config(format!(
                "API key not set (expected environment variable {name})"
            ))),
        }
    }

    /// The raw key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Write the key into a request body
    pub fn apply(&self, body: &mut JsonObject) {
        body.insert(
            API_KEY_FIELD.to_string(),
            JsonValue::String(self.api_key.clone()),
        );
    }
}

impl std::fmt::Debug for ApiKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredential")
            .field("api_key", &"***")
            .finish()
    }
}
