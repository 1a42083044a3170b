//! Binding entities
//!
//! Compatibility declarations published by strategies, the per-binding context
//! handed to compliance enforcement, and the wiring plan a strategy produces
//! for the provisioning backend.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

/// Static declaration that `source_type` may bind to `target_type` via `capability`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompatibilityEntry {
    pub source_type: String,
    pub target_type: String,
    pub capability: String,
    pub description: String,
}

impl CompatibilityEntry {
    pub fn new(
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        capability: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            target_type: target_type.into(),
            capability: capability.into(),
            description: description.into(),
        }
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.source_type.trim().is_empty() {
            missing.push("source_type");
        }
        if self.target_type.trim().is_empty() {
            missing.push("target_type");
        }
        if self.capability.trim().is_empty() {
            missing.push("capability");
        }
        missing
    }
}

impl fmt::Display for CompatibilityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.source_type, self.target_type, self.capability
        )
    }
}

/// Static declaration that events of `event_type` on `source_type` may trigger `target_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TriggerEntry {
    pub source_type: String,
    pub target_type: String,
    pub event_type: String,
    pub description: String,
}

impl TriggerEntry {
    pub fn new(
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        event_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            target_type: target_type.into(),
            event_type: event_type.into(),
            description: description.into(),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.source_type.trim().is_empty() {
            missing.push("source_type");
        }
        if self.target_type.trim().is_empty() {
            missing.push("target_type");
        }
        if self.event_type.trim().is_empty() {
            missing.push("event_type");
        }
        missing
    }
}

impl fmt::Display for TriggerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}]",
            self.source_type, self.target_type, self.event_type
        )
    }
}

/// One side of a binding: a named component instance and its resolved config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingEndpoint {
    pub name: String,
    pub component_type: String,
    pub config: ConfigValue,
}

impl BindingEndpoint {
    pub fn new(
        name: impl Into<String>,
        component_type: impl Into<String>,
        config: ConfigValue,
    ) -> Self {
        Self {
            name: name.into(),
            component_type: component_type.into(),
            config,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkExposure {
    pub publicly_accessible: bool,
    pub allowed_cidrs: Vec<String>,
    pub port: Option<u16>,
}

impl NetworkExposure {
    /// True when the target is public or admits any address.
    pub fn is_open_to_internet(&self) -> bool {
        self.publicly_accessible
            || self
                .allowed_cidrs
                .iter()
                .any(|c| c == "0.0.0.0/0" || c == "::/0")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncryptionState {
    pub at_rest: bool,
    pub in_transit: bool,
    pub customer_managed_key: bool,
}

/// What the target publishes for a capability: resource scopes, network and encryption facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityData {
    pub capability: String,
    pub resources: Vec<String>,
    pub network: NetworkExposure,
    pub encryption: EncryptionState,
}

/// Access requested by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    #[default]
    Read,
    Write,
    ReadWrite,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::ReadWrite => "read-write",
            AccessLevel::Admin => "admin",
        }
    }

    pub fn can_write(&self) -> bool {
        !matches!(self, AccessLevel::Read)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingOptions {
    pub access: AccessLevel,
    pub tags: BTreeMap<String, String>,
    pub cross_account: bool,
    pub iam_auth: bool,
    pub audit_logging: bool,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            access: AccessLevel::default(),
            tags: BTreeMap::new(),
            cross_account: false,
            iam_auth: false,
            audit_logging: true,
        }
    }
}

/// Input to compliance enforcement. Built per binding evaluation and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedBindingContext {
    pub source: BindingEndpoint,
    pub target: BindingEndpoint,
    pub target_capability_data: CapabilityData,
    pub compliance_framework: ComplianceFramework,
    pub options: BindingOptions,
}

impl EnhancedBindingContext {
    /// `source -> target (capability)`
    pub fn label(&self) -> String {
        format!(
            "{} -> {} ({})",
            self.source.name, self.target.name, self.target_capability_data.capability
        )
    }
}

/// An access grant the backend must attach to the source's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

/// A network rule opening the target to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkRule {
    pub from: String,
    pub to: String,
    pub port: u16,
    pub protocol: String,
}

/// Event delivery from a trigger source to its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSourceMapping {
    pub source: String,
    pub target: String,
    pub event_type: String,
    pub batch_size: u32,
}

/// Wiring instructions produced by a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WiringPlan {
    pub environment: BTreeMap<String, String>,
    pub grants: Vec<AccessGrant>,
    pub network_rules: Vec<NetworkRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_sources: Vec<EventSourceMapping>,
}

impl WiringPlan {
    pub fn is_empty(&self) -> bool {
        self.environment.is_empty()
            && self.grants.is_empty()
            && self.network_rules.is_empty()
            && self.event_sources.is_empty()
    }
}
