//! Tap configuration
//!
//! The configuration is loaded once at startup from a JSON document and is
//! passed by reference into every component afterwards; nothing mutates it.

use crate::error::{Error, Result};
use crate::types::{OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Chameleon API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.chameleon.io";

/// Default page size for the responses endpoint
pub const DEFAULT_LIMIT: u32 = 50;

/// Header carrying the account secret
pub const ACCOUNT_SECRET_HEADER: &str = "X-Account-Secret";

/// User-supplied tap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Base URL for API requests
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Account secret sent as `X-Account-Secret`
    #[serde(default)]
    pub api_account_secret: Option<String>,

    /// Survey whose responses are extracted
    #[serde(default)]
    pub survey_id: Option<String>,

    /// Human-readable survey name, informational only
    #[serde(default)]
    pub survey_name: Option<String>,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Upper bound override (`before`), timestamp or ID
    #[serde(default)]
    pub created_before: Option<String>,

    /// Lower bound override (`after`), timestamp or ID
    #[serde(default)]
    pub created_after: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_account_secret: None,
            survey_id: None,
            survey_name: None,
            limit: DEFAULT_LIMIT,
            created_before: None,
            created_after: None,
        }
    }
}

impl TapConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("Invalid config JSON: {e}")))
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Check the values that must be present before any stream runs
    pub fn validate(&self) -> Result<()> {
        if self.secret().is_none() {
            return Err(Error::missing_config("api_account_secret"));
        }
        if self.limit == 0 {
            return Err(Error::InvalidConfigValue {
                field: "limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        url::Url::parse(&self.api_base_url)?;
        Ok(())
    }

    /// Account secret, treating an empty string as absent
    pub fn secret(&self) -> Option<&str> {
        self.api_account_secret.as_deref().filter(|s| !s.is_empty())
    }

    /// Survey selector, treating an empty string as absent
    pub fn survey_id(&self) -> Option<&str> {
        self.survey_id.as_deref().filter(|s| !s.is_empty())
    }

    /// `created_before` override, if set to a non-empty value
    pub fn created_before(&self) -> Option<String> {
        self.created_before.clone().none_if_empty()
    }

    /// `created_after` override, if set to a non-empty value
    pub fn created_after(&self) -> Option<String> {
        self.created_after.clone().none_if_empty()
    }

    /// Static headers sent with every request
    pub fn headers(&self) -> StringMap {
        let mut headers = StringMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(secret) = self.secret() {
            headers.insert(ACCOUNT_SECRET_HEADER.to_string(), secret.to_string());
        }
        headers
    }
}
