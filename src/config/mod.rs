//! Engine configuration for Stratus
//!
//! Priority, highest first:
//! 1. CLI flags
//! 2. Environment variables (STRATUS_*)
//! 3. Project config (`stratus.toml`)
//! 4. Built-in defaults
//!
//! The `[platform]`, `[posture]` and `[environments]` sections feed the
//! platform, compliance and environment configuration layers.

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use env_validator::EnvVarValidator;
pub use loader::{parse_with_warnings, with_overrides_from};
pub use types::{
    DefaultsConfig, EnforcementConfig, EngineConfig, OutputConfig, PlatformConfig, TypeDefaults,
    Verbosity,
};
