//! Tests for StateManager

use super::*;
use crate::error::Error;
use crate::incremental::ReplicationState;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn mark(value: &str) -> ReplicationState {
    ReplicationState::parse(value).unwrap()
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"users": {"replication_key": "lastUpdated", "replication_key_value": "2024-01-01T00:00:00.000Z"}}}"#,
    )
    .unwrap();

    assert!(manager.is_in_memory());
    assert_eq!(
        manager.replication_state("users", "lastUpdated").await.unwrap(),
        Some(mark("2024-01-01T00:00:00Z"))
    );
    assert!(manager.replication_state("groups", "lastUpdated").await.unwrap().is_none());
}

#[tokio::test]
async fn test_from_json_mismatched_key() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"users": {"replication_key": "id", "replication_key_value": "2024-01-01T00:00:00.000Z"}}}"#,
    )
    .unwrap();

    let err = manager
        .replication_state("users", "lastUpdated")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::State { .. }));
}

#[test]
fn test_from_json_invalid() {
    let err = StateManager::from_json("{not json").unwrap_err();
    assert!(matches!(err, Error::State { .. }));
}

// ============================================================================
// Bookmark Tests
// ============================================================================

#[tokio::test]
async fn test_set_bookmark_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.replication_state("users", "lastUpdated").await.unwrap().is_none());

    manager
        .set_bookmark("users", "lastUpdated", &mark("2024-02-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(
        manager.replication_state("users", "lastUpdated").await.unwrap(),
        Some(mark("2024-02-01T00:00:00Z"))
    );
}

#[tokio::test]
async fn test_clear_stream() {
    let manager = StateManager::in_memory();
    manager
        .set_bookmark("users", "lastUpdated", &mark("2024-02-01T00:00:00Z"))
        .await
        .unwrap();

    manager.clear_stream("users").await.unwrap();
    assert!(manager.replication_state("users", "lastUpdated").await.unwrap().is_none());
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    manager
        .set_bookmark("users", "lastUpdated", &mark("2024-03-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(
        clone.replication_state("users", "lastUpdated").await.unwrap(),
        Some(mark("2024-03-01T00:00:00Z"))
    );
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    manager
        .set_bookmark("users", "lastUpdated", &mark("2024-04-01T10:00:00Z"))
        .await
        .unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(reloaded.snapshot().await, manager.snapshot().await);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw["bookmarks"]["users"]["replication_key_value"],
        "2024-04-01T10:00:00.000Z"
    );
}

#[test]
fn test_load_nonexistent_file() {
    let dir = tempdir().unwrap();
    let manager = StateManager::from_file(dir.path().join("missing.json")).unwrap();
    assert!(!manager.is_in_memory());
}

#[test]
fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ broken").unwrap();

    let err = StateManager::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::State { .. }));
}

#[tokio::test]
async fn test_save_in_memory_noop() {
    let manager = StateManager::in_memory();
    manager.save().await.unwrap();
    assert_eq!(manager.to_json().await.unwrap(), r#"{"bookmarks":{}}"#);
}
