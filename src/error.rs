//! Error types for Stratus
//!
//! Library errors use `thiserror`; the binary and use cases wrap them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::services::{RegistryError, ResolveError};

/// Result type alias for Stratus operations
pub type StratusResult<T> = Result<T, StratusError>;

/// Main error type for Stratus operations
#[derive(Error, Debug)]
pub enum StratusError {
    /// A component's configuration could not be resolved
    #[error("component '{component}' failed to resolve: {source}")]
    Resolve {
        component: String,
        #[source]
        source: ResolveError,
    },

    /// Manifest references a component type with no registered definition
    #[error("unknown component type '{component_type}' for component '{component}'")]
    UnknownComponentType {
        component: String,
        component_type: String,
    },

    /// Registration against the binder registry failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Synthesis was started against a registry that still accepts registrations
    #[error("binder registry must be sealed before synthesis starts")]
    RegistryNotSealed,

    /// Manifest could not be parsed
    #[error("invalid manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Engine configuration could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Unsupported manifest file extension
    #[error("unsupported manifest format for {file} (expected .yaml, .yml or .toml)")]
    UnsupportedManifestFormat { file: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
