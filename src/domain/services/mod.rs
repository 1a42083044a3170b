//! Domain Services
//!
//! Pure business logic that operates on domain entities. No I/O.

mod binder_registry;
mod config_resolver;
mod layer_merger;
mod normalize;
mod schema_validator;
mod suggest;

pub use binder_registry::{BinderRegistry, MatrixValidation, RegistryError};
pub use config_resolver::{resolve, ConfigResolver, ResolveError};
pub use layer_merger::{deep_merge, merge_layers, LayerTypeConflict, MergeResult};
pub use normalize::sanitize_resource_name;
pub use schema_validator::{apply_defaults, validate, SchemaViolation, ViolationReason};
pub use suggest::{levenshtein, suggest};
