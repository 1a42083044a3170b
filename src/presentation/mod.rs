//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Output formatting (text/NDJSON)
//!
//! ## Structure
//!
//! - `cli` - Command-line definition shared by the binary and its tests
//! - `json` - NDJSON event types
//! - `output` - Plain-text renderers

pub mod cli;
pub mod json;
pub mod output;

pub use cli::{Cli, Commands};
