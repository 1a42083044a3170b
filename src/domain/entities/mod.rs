//! Domain Entities
//!
//! - `Schema` - Structural description of a component type's configuration
//! - `ConfigLayer` / `LayerStack` - Ordered partial configuration sources
//! - `ResolvedConfig` - Merged, normalised, validated configuration
//! - Binding and compliance records exchanged between registry, enforcer and pipeline

mod binding;
mod compliance;
mod layer;
mod resolved_config;
mod schema;

pub use binding::{
    AccessGrant, AccessLevel, BindingEndpoint, BindingOptions, CapabilityData,
    CompatibilityEntry, EncryptionState, EnhancedBindingContext, EventSourceMapping,
    NetworkExposure, NetworkRule, TriggerEntry, WiringPlan,
};
pub use compliance::{
    ActionKind, ComplianceAction, ComplianceViolation, EnforcementMetadata, EnforcementResult,
    Severity, INTERNAL_ERROR_KIND,
};
pub use layer::{ConfigLayer, LayerKind, LayerStack};
pub use resolved_config::{OverrideInfo, ResolvedConfig, NORMALIZED_SOURCE, SCHEMA_DEFAULT_SOURCE};
pub use schema::{NumericRange, Schema, SchemaKind};
