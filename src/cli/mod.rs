//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `discover` - Print the stream catalog
//! - `read` - Extract records and emit Singer messages

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{ReadSummary, Runner};
