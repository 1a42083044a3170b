//! Domain Layer
//!
//! The decision engine: pure business logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Schemas, layers, resolved configs, binding and compliance records
//! - `value_objects/` - Immutable value types (ConfigValue, ConfigPath, ComplianceFramework)
//! - `services/` - Layer merger, schema validator, config resolver, binder registry
//! - `policies/` - Compliance enforcement rule table
//! - `ports/` - Traits implemented by component types, strategies and rules
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network
//! 2. **Pure Functions** - Resolution and enforcement depend only on their inputs
//! 3. **Ports** - Component types, strategies and rules plug in through traits

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
