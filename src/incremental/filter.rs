//! Replication filter construction
//!
//! Builds the Okta filter expression selecting records newer than the
//! high-water mark, e.g. `lastUpdated gt "2024-01-01T00:00:00.000Z"`.

use crate::pagination::RequestDescriptor;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Query parameter the filter expression is sent in
pub const FILTER_PARAM: &str = "filter";

/// Characters escaped inside a query value.
///
/// Unreserved characters pass through, and so do `:` and `+`, which the Okta
/// filter grammar needs verbatim inside timestamps.
pub const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'+');

/// Percent-encode a single query value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// A `<key> gt "<timestamp>"` filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    raw: String,
}

impl FilterExpression {
    /// The unencoded expression
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The expression encoded for use as a query value
    pub fn encoded(&self) -> String {
        encode_query_value(&self.raw)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Build the "newer than" filter for a replication key.
///
/// `since` must already be in the wire format.
pub fn build_filter(replication_key: &str, since: &str) -> FilterExpression {
    FilterExpression {
        raw: format!("{replication_key} gt \"{since}\""),
    }
}

/// Inject a filter into an existing parameter set.
///
/// The raw expression is stored; encoding happens once, when the descriptor
/// renders its query string.
pub fn merge_into_params(
    mut params: RequestDescriptor,
    filter: &FilterExpression,
) -> RequestDescriptor {
    params.insert(FILTER_PARAM, filter.raw());
    params
}
