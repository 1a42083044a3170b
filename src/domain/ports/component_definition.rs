//! ComponentDefinition port
//!
//! Everything the resolver needs to know about one component type.

use crate::domain::entities::{CapabilityData, Schema};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

/// Inputs available to a normaliser besides the merged value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeContext {
    pub component_name: String,
    pub framework: ComplianceFramework,
    pub environment: String,
}

impl NormalizeContext {
    pub fn new(
        component_name: impl Into<String>,
        framework: ComplianceFramework,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            framework,
            environment: environment.into(),
        }
    }
}

pub trait ComponentDefinition: Send + Sync {
    /// Type key used in manifests (`worker`, `queue`, ...).
    fn component_type(&self) -> &str;

    fn schema(&self) -> &Schema;

    /// Built-in defaults. Must satisfy every required field of the schema on its own.
    fn hardcoded_fallback(&self) -> ConfigValue;

    /// Rewrite the merged value in place: sanitise names, derive fields.
    /// Runs before schema defaults are filled.
    fn normalize(&self, _config: &mut ConfigValue, _ctx: &NormalizeContext) {}

    /// Facts this component publishes to a binding source for `capability`.
    fn capability_data(&self, name: &str, capability: &str, config: &ConfigValue)
        -> CapabilityData;
}
