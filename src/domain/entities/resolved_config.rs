//! Resolved configuration entity
//!
//! The immutable product of merging, normalising and validating one component
//! instance's layers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value_objects::{ComplianceFramework, ConfigPath, ConfigValue, ContentHash};

/// Provenance label for leaves rewritten by normalisation.
pub const NORMALIZED_SOURCE: &str = "normalized";
/// Provenance label for leaves filled from a schema default.
pub const SCHEMA_DEFAULT_SOURCE: &str = "schema-default";

/// A higher layer replaced a value set by a lower one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideInfo {
    pub path: ConfigPath,
    pub from_layer: String,
    pub by_layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub component: String,
    pub component_type: String,
    pub framework: ComplianceFramework,
    pub environment: String,
    pub values: ConfigValue,
    pub fingerprint: ContentHash,
    /// Layer name that supplied each leaf.
    pub provenance: BTreeMap<ConfigPath, String>,
    pub overrides: Vec<OverrideInfo>,
}

impl ResolvedConfig {
    pub fn new(
        component: impl Into<String>,
        component_type: impl Into<String>,
        framework: ComplianceFramework,
        environment: impl Into<String>,
        values: ConfigValue,
    ) -> Self {
        let fingerprint = ContentHash::of_value(&values);
        Self {
            component: component.into(),
            component_type: component_type.into(),
            framework,
            environment: environment.into(),
            values,
            fingerprint,
            provenance: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_provenance(mut self, provenance: BTreeMap<ConfigPath, String>) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn with_overrides(mut self, overrides: Vec<OverrideInfo>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Dotted-path lookup into the resolved values.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        self.values.lookup(path)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(ConfigValue::as_str)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(ConfigValue::as_bool)
    }

    /// Which layer set `path`.
    pub fn source_of(&self, path: &str) -> Option<&str> {
        self.provenance
            .get(&ConfigPath::parse(path))
            .map(String::as_str)
    }
}
