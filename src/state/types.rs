//! State types for tracking extraction progress
//!
//! Serialized in the Singer bookmark shape:
//! `{"bookmarks": {"users": {"replication_key": "...", "replication_key_value": "..."}}}`

use crate::error::{Error, Result};
use crate::incremental::ReplicationState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete persisted state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: HashMap<String, Bookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bookmark for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&Bookmark> {
        self.bookmarks.get(stream)
    }

    /// Record a new high-water mark for a stream
    pub fn set_bookmark(&mut self, stream: &str, key: &str, value: &ReplicationState) {
        self.bookmarks.insert(
            stream.to_string(),
            Bookmark {
                replication_key: Some(key.to_string()),
                replication_key_value: Some(value.to_string()),
            },
        );
    }

    /// Parsed high-water mark for a stream, if one is stored.
    ///
    /// A bookmark recorded for a different replication key is rejected rather
    /// than used to filter on `key`.
    pub fn replication_state(
        &self,
        stream: &str,
        key: &str,
    ) -> Result<Option<ReplicationState>> {
        let Some(bookmark) = self.get_bookmark(stream) else {
            return Ok(None);
        };
        match bookmark.replication_key.as_deref() {
            Some(stored) if stored != key => Err(Error::state(format!(
                "bookmark for stream '{stream}' tracks '{stored}', expected '{key}'"
            ))),
            _ => bookmark.replication_state(),
        }
    }
}

/// Bookmark for a single stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Replication key the value refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Latest replication key value seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<String>,
}

impl Bookmark {
    /// Parse the stored value into a replication state
    pub fn replication_state(&self) -> Result<Option<ReplicationState>> {
        self.replication_key_value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(ReplicationState::parse)
            .transpose()
    }
}
