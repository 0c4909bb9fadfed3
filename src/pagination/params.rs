//! Request parameter assembly
//!
//! Combines page size, the previous cursor, sorting, and the incremental
//! filter into one ordered parameter set per page request.

use crate::error::{Error, Result};
use crate::incremental::filter::encode_query_value;
use crate::incremental::{build_filter, merge_into_params, ReplicationState};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Page size parameter
pub const LIMIT_PARAM: &str = "limit";
/// Raw cursor parameter
pub const PAGE_PARAM: &str = "page";
/// Cursor token extracted from the next-page URL
pub const AFTER_PARAM: &str = "after";
/// Sort direction parameter
pub const SORT_PARAM: &str = "sort";
/// Sort key parameter
pub const ORDER_BY_PARAM: &str = "order_by";
/// Output format hint parameter
pub const FORMAT_PARAM: &str = "format";

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque token identifying the next page.
///
/// For Okta this is the full next-page URL taken from the `Link` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a cursor value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw cursor value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pull the `after` token out of the cursor URL's query string
    pub fn after_token(&self) -> Result<String> {
        let url = Url::parse(&self.0)
            .map_err(|e| Error::cursor_format(&self.0, format!("not a URL: {e}")))?;

        url.query_pairs()
            .filter(|(key, _)| key == AFTER_PARAM)
            .map(|(_, value)| value.into_owned())
            .last()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                Error::cursor_format(&self.0, format!("missing '{AFTER_PARAM}' query parameter"))
            })
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Request Descriptor
// ============================================================================

/// Ordered query parameters for a single page request.
///
/// Values are stored unencoded. `to_query_string` encodes every value exactly
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an existing value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a parameter is set
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parameter names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_str())
    }

    /// Parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as an encoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query_value(k), encode_query_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Builds the `RequestDescriptor` for each page
#[derive(Debug, Clone)]
pub struct RequestParameterAssembler {
    page_size: u32,
    replication_key: Option<String>,
    format_hint: String,
}

impl Default for RequestParameterAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RequestParameterAssembler {
    /// Create an assembler with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            replication_key: None,
            format_hint: "json".to_string(),
        }
    }

    /// Sort and filter by a replication key
    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    /// Override the output format hint sent alongside the sort parameters
    #[must_use]
    pub fn with_format_hint(mut self, hint: impl Into<String>) -> Self {
        self.format_hint = hint.into();
        self
    }

    /// Configured page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Configured replication key
    pub fn replication_key(&self) -> Option<&str> {
        self.replication_key.as_deref()
    }

    /// Assemble the parameters for the next request
    pub fn assemble(
        &self,
        prior_cursor: Option<&Cursor>,
        replication_state: Option<&ReplicationState>,
    ) -> Result<RequestDescriptor> {
        let mut params = RequestDescriptor::new();
        params.insert(LIMIT_PARAM, self.page_size.to_string());

        if let Some(cursor) = prior_cursor {
            let after = cursor.after_token()?;
            params.insert(PAGE_PARAM, cursor.as_str());
            params.insert(AFTER_PARAM, after);
        }

        let Some(key) = &self.replication_key else {
            return Ok(params);
        };

        params.insert(SORT_PARAM, "asc");
        params.insert(ORDER_BY_PARAM, key.as_str());
        params.insert(FORMAT_PARAM, self.format_hint.as_str());

        if let Some(state) = replication_state {
            let since = state.to_wire()?;
            params = merge_into_params(params, &build_filter(key, &since));
        }

        Ok(params)
    }
}
