//! Error types for tap-okta
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for tap-okta
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Unparsable Link header '{header}': {message}")]
    HeaderParse { header: String, message: String },

    #[error("Malformed pagination cursor '{cursor}': {message}")]
    CursorFormat { cursor: String, message: String },

    #[error("Pagination loop detected: cursor '{cursor}' repeated on page {page_count}")]
    PaginationLoop { cursor: String, page_count: u32 },

    // ============================================================================
    // Incremental Errors
    // ============================================================================
    #[error("Incorrect timestamp format, '{value}' should match '{expected}': {message}")]
    Validation {
        value: String,
        expected: String,
        message: String,
    },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    #[error("Stream '{stream}' not found in catalog")]
    StreamNotFound { stream: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a Link header parse error
    pub fn header_parse(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HeaderParse {
            header: header.into(),
            message: message.into(),
        }
    }

    /// Create a cursor format error
    pub fn cursor_format(cursor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CursorFormat {
            cursor: cursor.into(),
            message: message.into(),
        }
    }

    /// Create a pagination loop error
    pub fn pagination_loop(cursor: impl Into<String>, page_count: u32) -> Self {
        Self::PaginationLoop {
            cursor: cursor.into(),
            page_count,
        }
    }

    /// Create a timestamp validation error
    pub fn validation(
        value: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            value: value.into(),
            expected: expected.into(),
            message: message.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Check if this error came from the transport layer
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::RateLimited { .. }
                | Error::Timeout { .. }
        )
    }
}

/// Result type alias for tap-okta
pub type Result<T> = std::result::Result<T, Error>;
