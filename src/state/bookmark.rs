//! High-water mark tracking
//!
//! Watches emitted records and remembers the newest replication key value.

use crate::incremental::ReplicationState;
use crate::types::JsonValue;
use tracing::debug;

/// Running maximum of a replication key over observed records
#[derive(Debug, Clone)]
pub struct HighWaterMark {
    key: String,
    max: Option<ReplicationState>,
    unparsable: usize,
}

impl HighWaterMark {
    /// Track `key`, starting from an optional prior mark
    pub fn new(key: impl Into<String>, start: Option<ReplicationState>) -> Self {
        Self {
            key: key.into(),
            max: start,
            unparsable: 0,
        }
    }

    /// Replication key being tracked
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fold one record into the mark.
    ///
    /// Values are compared as instants, so mixed offsets order correctly.
    /// Records without a parsable value are counted and skipped.
    pub fn observe(&mut self, record: &JsonValue) {
        let Some(raw) = lookup(record, &self.key) else {
            self.unparsable += 1;
            return;
        };

        match ReplicationState::parse(raw) {
            Ok(value) => {
                if self.max.map_or(true, |max| value > max) {
                    self.max = Some(value);
                }
            }
            Err(e) => {
                debug!(key = %self.key, "Skipping replication value: {e}");
                self.unparsable += 1;
            }
        }
    }

    /// Current mark
    pub fn value(&self) -> Option<ReplicationState> {
        self.max
    }

    /// Number of records that carried no usable value
    pub fn unparsable(&self) -> usize {
        self.unparsable
    }
}

/// Resolve a dot-separated field path to a string value
fn lookup<'a>(record: &'a JsonValue, path: &str) -> Option<&'a str> {
    path.split('.')
        .try_fold(record, |current, part| current.get(part))?
        .as_str()
}
