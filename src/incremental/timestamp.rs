//! Timestamp validation and reformatting
//!
//! Bookmarks are stored as `%Y-%m-%dT%H:%M:%S%z`, but the Okta filter grammar
//! wants millisecond precision with a literal `Z`. These helpers move a
//! timestamp between the two shapes without losing the instant it names.

use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used for replication state (4-digit year through seconds with zone offset)
pub const STATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format the Okta API expects inside filter expressions
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Confirm that `value` serializes under `expected_format` and parses back.
///
/// The value is rendered in UTC, so zone-less formats still name the same instant.
pub fn validate(value: &DateTime<FixedOffset>, expected_format: &str) -> Result<()> {
    let rendered = render(&value.with_timezone(&Utc), expected_format)?;
    tracing::debug!("Validating timestamp {rendered} conforms to format {expected_format}");

    parse_with(&rendered, expected_format)
        .map(|_| ())
        .map_err(|e| Error::validation(value.to_rfc3339(), expected_format, e))
}

/// Serialize `value` in `source_format`, parse it back, and render it in `target_format`.
///
/// Both renders happen in UTC: a zone-less source format is read back as UTC,
/// and a target format ending in a literal `Z` describes the right instant.
pub fn reformat(
    value: &DateTime<FixedOffset>,
    source_format: &str,
    target_format: &str,
) -> Result<String> {
    let rendered = render(&value.with_timezone(&Utc), source_format)?;
    tracing::debug!("Converting '{rendered}' from '{source_format}' -> '{target_format}'");
    reformat_str(&rendered, source_format, target_format)
}

/// Parse `value` under `source_format` and render it in `target_format`.
pub fn reformat_str(value: &str, source_format: &str, target_format: &str) -> Result<String> {
    let parsed = parse_with(value, source_format)
        .map_err(|e| Error::validation(value, source_format, e))?;
    render(&parsed.with_timezone(&Utc), target_format)
}

/// Parse a timestamp string in an explicit format.
///
/// Formats without a zone specifier are interpreted as UTC.
pub fn parse(value: &str, format: &str) -> Result<DateTime<FixedOffset>> {
    parse_with(value, format).map_err(|e| Error::validation(value, format, e))
}

fn parse_with(value: &str, format: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    match DateTime::parse_from_str(value, format) {
        Ok(dt) => Ok(dt),
        Err(zoned_err) => NaiveDateTime::parse_from_str(value, format)
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| zoned_err.to_string()),
    }
}

fn render<Tz>(value: &DateTime<Tz>, format: &str) -> Result<String>
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::validation(
            value.to_rfc3339(),
            format,
            "format string contains an invalid specifier",
        ));
    }
    Ok(value.format(format).to_string())
}

// ============================================================================
// Replication State
// ============================================================================

/// High-water mark a collection is resumed from.
///
/// Read-only for the pagination core; the caller derives the next mark from
/// the records it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReplicationState(DateTime<FixedOffset>);

impl ReplicationState {
    /// Wrap an already parsed timestamp, validating it against the state format
    pub fn new(value: DateTime<FixedOffset>) -> Result<Self> {
        validate(&value, STATE_FORMAT)?;
        Ok(Self(value))
    }

    /// Parse a stored bookmark.
    ///
    /// Accepts RFC 3339 (what Okta returns in `lastUpdated`), the state format,
    /// and the wire format.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let parsed = DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .or_else(|| parse_with(trimmed, STATE_FORMAT).ok())
            .or_else(|| parse_with(trimmed, WIRE_FORMAT).ok())
            .ok_or_else(|| {
                Error::validation(value, STATE_FORMAT, "not a recognizable timestamp")
            })?;
        Self::new(parsed)
    }

    /// The underlying timestamp
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Render in the Okta filter wire format
    pub fn to_wire(&self) -> Result<String> {
        reformat(&self.0, STATE_FORMAT, WIRE_FORMAT)
    }

    /// Render in the state format
    pub fn to_state_string(&self) -> String {
        self.0.format(STATE_FORMAT).to_string()
    }
}

impl fmt::Display for ReplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl TryFrom<String> for ReplicationState {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ReplicationState> for String {
    fn from(state: ReplicationState) -> Self {
        state.to_string()
    }
}
