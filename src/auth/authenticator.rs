//! Authenticator implementation
//!
//! Applies the configured credential to outgoing requests.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
    header_name: HeaderName,
    header_value: HeaderValue,
}

impl Authenticator {
    /// Create a new authenticator, validating the header up front
    pub fn new(config: AuthConfig) -> Result<Self> {
        let header_name = HeaderName::from_bytes(config.header_name.as_bytes())
            .map_err(|e| Error::invalid_value("header_name", e.to_string()))?;
        let mut header_value = HeaderValue::from_str(&config.header_value())
            .map_err(|e| Error::invalid_value("api_key", e.to_string()))?;
        header_value.set_sensitive(true);

        Ok(Self {
            config,
            header_name,
            header_value,
        })
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(self.header_name.clone(), self.header_value.clone())
    }

    /// Get the auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
