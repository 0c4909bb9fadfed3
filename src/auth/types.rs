//! Auth configuration types

use crate::error::{Error, Result};
use std::fmt;

/// Authorization scheme Okta uses for API tokens
pub const SSWS_SCHEME: &str = "SSWS";

/// Header the credential is sent in
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// API key authentication: `<header>: <scheme> <api_key>`
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Header name
    pub header_name: String,
    /// Literal scheme prefix (e.g. "SSWS")
    pub scheme: String,
    /// The API key value
    pub api_key: String,
}

impl AuthConfig {
    /// Create an Okta `SSWS` API key config
    pub fn ssws(api_key: impl Into<String>) -> Result<Self> {
        Self::api_key(SSWS_SCHEME, api_key)
    }

    /// Create an API key config with a custom scheme
    pub fn api_key(scheme: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if api_key.chars().any(char::is_control) {
            return Err(Error::invalid_value(
                "api_key",
                "must not contain control characters",
            ));
        }

        Ok(Self {
            header_name: AUTHORIZATION_HEADER.to_string(),
            scheme: scheme.into(),
            api_key,
        })
    }

    /// The full header value
    pub fn header_value(&self) -> String {
        if self.scheme.is_empty() {
            self.api_key.clone()
        } else {
            format!("{} {}", self.scheme, self.api_key)
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("header_name", &self.header_name)
            .field("scheme", &self.scheme)
            .field("api_key", &"***")
            .finish()
    }
}
