//! Service manifest
//!
//! A manifest declares the components of one service and how they are wired.
//! It is read from an explicit YAML or TOML file.
//!
//! ```yaml
//! service: orders
//! owner: payments-team
//! environment: prod
//! compliance_framework: fedramp-moderate
//! components:
//!   - name: api
//!     type: worker
//!     config:
//!       memory_mb: 1024
//!   - name: events
//!     type: queue
//! bindings:
//!   - from: api
//!     to: events
//!     capability: queue:publish
//!     access: write
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AccessLevel, BindingOptions};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};
use crate::error::{StratusError, StratusResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub service: String,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default, alias = "framework")]
    pub compliance_framework: Option<ComplianceFramework>,

    /// Tags applied to every binding
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub components: Vec<ComponentSpec>,

    #[serde(default)]
    pub bindings: Vec<BindingSpec>,

    #[serde(default)]
    pub triggers: Vec<TriggerSpec>,
}

/// One component instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub component_type: String,

    /// User layer for this instance
    #[serde(default)]
    pub config: ConfigValue,
}

/// A capability binding between two components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    pub from: String,
    pub to: String,
    pub capability: String,

    #[serde(default)]
    pub access: AccessLevel,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub cross_account: bool,

    #[serde(default)]
    pub iam_auth: bool,

    #[serde(default = "default_true")]
    pub audit_logging: bool,
}

impl BindingSpec {
    /// Binding options with `inherited` tags underneath the binding's own.
    pub fn options(&self, inherited: &BTreeMap<String, String>) -> BindingOptions {
        let mut tags = inherited.clone();
        tags.extend(self.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        BindingOptions {
            access: self.access,
            tags,
            cross_account: self.cross_account,
            iam_auth: self.iam_auth,
            audit_logging: self.audit_logging,
        }
    }
}

/// An event trigger from one component into another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSpec {
    pub from: String,
    pub to: String,
    pub event: String,

    #[serde(default)]
    pub batch_size: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl Manifest {
    /// Load a manifest, choosing the format by file extension.
    pub fn load(path: &Path) -> StratusResult<Self> {
        let content = fs::read_to_string(path)?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => {
                return Err(StratusError::UnsupportedManifestFormat {
                    file: path.to_path_buf(),
                })
            }
        };
        parsed.map_err(|message| StratusError::InvalidManifest {
            file: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        serde_yaml_ng::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Tags inherited by every binding: manifest tags plus `service` and `owner`.
    pub fn binding_tags(&self) -> BTreeMap<String, String> {
        let mut tags = self.tags.clone();
        tags.insert("service".to_string(), self.service.clone());
        if let Some(owner) = &self.owner {
            tags.insert("owner".to_string(), owner.clone());
        }
        tags
    }

    /// Duplicate component names and dangling binding/trigger endpoints.
    pub fn validate_references(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = BTreeSet::new();
        for component in &self.components {
            if !seen.insert(component.name.as_str()) {
                problems.push(format!("duplicate component name '{}'", component.name));
            }
        }

        let mut check = |kind: &str, index: usize, end: &str, name: &str| {
            if !seen.contains(name) {
                problems.push(format!(
                    "{}[{}].{} references unknown component '{}'",
                    kind, index, end, name
                ));
            }
        };
        for (i, binding) in self.bindings.iter().enumerate() {
            check("bindings", i, "from", &binding.from);
            check("bindings", i, "to", &binding.to);
        }
        for (i, trigger) in self.triggers.iter().enumerate() {
            check("triggers", i, "from", &trigger.from);
            check("triggers", i, "to", &trigger.to);
        }
        problems
    }
}
