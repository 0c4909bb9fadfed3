//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::types::State;
use crate::error::{Error, Result};
use crate::incremental::ReplicationState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State manager for persisting and loading state
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (empty for in-memory)
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Create a state manager writing to `path`, starting from empty state
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self::new(PathBuf::new())
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create an in-memory state manager from inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let state = parse_state(json)?;
        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Get a snapshot of the current state
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Stored high-water mark for a stream's replication key
    pub async fn replication_state(
        &self,
        stream: &str,
        key: &str,
    ) -> Result<Option<ReplicationState>> {
        self.state.read().await.replication_state(stream, key)
    }

    /// Record a new high-water mark and persist it
    pub async fn set_bookmark(
        &self,
        stream: &str,
        key: &str,
        value: &ReplicationState,
    ) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.set_bookmark(stream, key, value);
        }
        self.save().await
    }

    /// Clear the bookmark for a stream
    pub async fn clear_stream(&self, stream: &str) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.bookmarks.remove(stream);
        }
        self.save().await
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

fn parse_state(json: &str) -> Result<State> {
    if json.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(json).map_err(|e| Error::state(format!("Failed to parse state: {e}")))
}
