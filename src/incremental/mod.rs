//! Incremental replication module
//!
//! Everything needed to turn a stored high-water mark into a request filter.
//!
//! # Overview
//!
//! - `timestamp` - validates bookmarks and converts them into the wire format
//! - `filter` - builds and merges the `<key> gt "<timestamp>"` filter expression

pub mod filter;
pub mod timestamp;

pub use filter::{build_filter, merge_into_params, FilterExpression, FILTER_PARAM};
pub use timestamp::{reformat, validate, ReplicationState, STATE_FORMAT, WIRE_FORMAT};

#[cfg(test)]
mod tests;
