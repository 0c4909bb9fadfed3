//! Decoder traits

use crate::error::Result;
use serde_json::Value;

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Decode the response body into a single JSON value (full response)
    fn decode_raw(&self, body: &str) -> Result<Value>;
}
