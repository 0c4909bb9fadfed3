//! State management module
//!
//! Persists the per-stream high-water mark between runs so the next run can
//! resume incrementally.
//!
//! # Overview
//!
//! - `State` / `Bookmark` - Singer-shaped bookmark document
//! - `StateManager` - file-backed persistence with atomic writes
//! - `HighWaterMark` - derives the next bookmark from emitted records

mod bookmark;
mod manager;
mod types;

pub use bookmark::HighWaterMark;
pub use manager::StateManager;
pub use types::{Bookmark, State};

#[cfg(test)]
mod manager_tests;
