//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod compliance_framework;
mod config_path;
mod config_value;
mod config_warning;
mod hash;

pub use compliance_framework::{ComplianceFramework, UnknownFramework};
pub use config_path::ConfigPath;
pub use config_value::{ConfigValue, ValueKind, ValueShape};
pub use config_warning::ConfigWarning;
pub use hash::ContentHash;
