//! Tap configuration
//!
//! Resolved once, before extraction starts. Required fields are enforced
//! here so a missing credential never reaches the network.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::incremental::ReplicationState;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::types::{JsonValue, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Per-request timeout when `timeout_secs` is not set
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw configuration as it appears in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    records_path: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    max_retries: Option<u32>,
    #[serde(default)]
    user_agent: Option<String>,
}

/// Validated tap configuration
#[derive(Clone)]
pub struct TapConfig {
    /// Base URL of the Okta API (e.g. `https://example.okta.com/api/v1`)
    pub api_url: Url,
    /// Okta API token
    pub api_key: String,
    /// Records per page
    pub page_size: u32,
    /// Starting high-water mark used when no bookmark exists
    pub start_date: Option<ReplicationState>,
    /// Override for where records live in the response document
    pub records_path: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries the HTTP client performs before giving up
    pub max_retries: u32,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl TapConfig {
    /// Build a config from its required fields
    pub fn new(api_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::from_raw(RawConfig {
            api_url: Some(api_url.to_string()),
            api_key: Some(api_key.into()),
            ..RawConfig::default()
        })
    }

    /// Parse and validate a config from a JSON value
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let raw: RawConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_raw(raw)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&contents)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let api_url = raw
            .api_url
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("api_url"))?;
        let api_url = Url::parse(api_url.trim())
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", api_url.scheme()),
            ));
        }

        let api_key = raw
            .api_key
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("api_key"))?;

        let page_size = raw.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }

        let start_date = raw
            .start_date
            .none_if_empty()
            .map(|s| ReplicationState::parse(&s))
            .transpose()?;

        Ok(Self {
            api_url,
            api_key,
            page_size,
            start_date,
            records_path: raw.records_path.none_if_empty(),
            timeout: Duration::from_secs(timeout_secs),
            max_retries: raw.max_retries.unwrap_or(3),
            user_agent: raw.user_agent.none_if_empty(),
        })
    }

    /// Auth config for the API key
    pub fn auth_config(&self) -> Result<AuthConfig> {
        AuthConfig::ssws(self.api_key.clone())
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.api_url.as_str())
            .timeout(self.timeout)
            .max_retries(self.max_retries)
            .header("Accept", "application/json");
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Build an authenticated HTTP client
    pub fn build_client(&self) -> Result<HttpClient> {
        let authenticator = Authenticator::new(self.auth_config()?)?;
        HttpClient::with_auth(self.http_config(), authenticator)
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"***")
            .field("page_size", &self.page_size)
            .field("start_date", &self.start_date)
            .field("records_path", &self.records_path)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
