//! Stream catalog
//!
//! The collections this tap knows how to extract.

use crate::decode::ROOT_RECORDS_PATH;
use crate::error::{Error, Result};
use crate::types::SyncMode;
use serde::{Deserialize, Serialize};

/// Definition of one extractable collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefinition {
    /// Stream name
    pub name: String,
    /// Path relative to the API base URL
    pub path: String,
    /// Fields uniquely identifying a record
    pub primary_keys: Vec<String>,
    /// Field used to order and incrementally filter the collection
    pub replication_key: Option<String>,
    /// Where records live in the response document
    pub records_path: String,
}

impl StreamDefinition {
    /// Okta users (`/users`), incremental on `lastUpdated`
    pub fn users() -> Self {
        Self {
            name: "users".to_string(),
            path: "/users".to_string(),
            primary_keys: vec!["id".to_string()],
            replication_key: Some("lastUpdated".to_string()),
            records_path: ROOT_RECORDS_PATH.to_string(),
        }
    }

    /// Sync mode implied by the replication key
    pub fn sync_mode(&self) -> SyncMode {
        if self.replication_key.is_some() {
            SyncMode::Incremental
        } else {
            SyncMode::FullRefresh
        }
    }
}

/// All built-in streams
pub fn catalog() -> Vec<StreamDefinition> {
    vec![StreamDefinition::users()]
}

/// Look up a built-in stream by name
pub fn find_stream(name: &str) -> Result<StreamDefinition> {
    catalog()
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| Error::StreamNotFound {
            stream: name.to_string(),
        })
}
