//! Common test utilities for Stratus contract and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated working directory plus helpers to run the `stratus` binary
//! - Fixtures: reusable manifests and binding contexts

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
