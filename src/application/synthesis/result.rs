//! Synthesis Result
//!
//! What the pipeline hands to the provisioning backend and to reports.

use serde::Serialize;

use crate::domain::entities::{
    ComplianceAction, EnforcementResult, ResolvedConfig, Severity, WiringPlan,
};
use crate::domain::value_objects::ComplianceFramework;

/// Resolution outcome for one component instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentOutcome {
    pub name: String,
    pub component_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ComponentOutcome {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Decision for one binding or trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Verdict {
    /// Supported and compliant; wiring is planned
    Approved,
    /// Supported but blocked by compliance
    Blocked,
    /// No registered strategy handles the pairing
    Unsupported { alternatives: Vec<String> },
    /// Not evaluated because an endpoint failed to resolve
    Skipped { reason: String },
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Blocked => "blocked",
            Verdict::Unsupported { .. } => "unsupported",
            Verdict::Skipped { .. } => "skipped",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved)
    }
}

/// Outcome for one binding or trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionOutcome {
    /// `from -> to (capability)` or `from -> to [event]`
    pub label: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforcement: Option<EnforcementResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiring: Option<WiringPlan>,
}

impl ConnectionOutcome {
    pub(crate) fn new(label: String, from: &str, to: &str, verdict: Verdict) -> Self {
        Self {
            label,
            from: from.to_string(),
            to: to.to_string(),
            strategy: None,
            verdict,
            enforcement: None,
            wiring: None,
        }
    }
}

/// Full synthesis plan for one manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisPlan {
    pub service: String,
    pub framework: ComplianceFramework,
    pub environment: String,
    pub warnings_as_errors: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manifest_errors: Vec<String>,
    pub components: Vec<ComponentOutcome>,
    pub bindings: Vec<ConnectionOutcome>,
    pub triggers: Vec<ConnectionOutcome>,
}

impl SynthesisPlan {
    fn connections(&self) -> impl Iterator<Item = &ConnectionOutcome> {
        self.bindings.iter().chain(self.triggers.iter())
    }

    /// Nothing blocks provisioning.
    pub fn is_provisionable(&self) -> bool {
        self.manifest_errors.is_empty()
            && self.components.iter().all(ComponentOutcome::is_resolved)
            && self.connections().all(|c| c.verdict.is_approved())
    }

    /// One line per blocking problem, components first.
    pub fn blocking_reasons(&self) -> Vec<String> {
        let mut reasons = self.manifest_errors.clone();

        for component in &self.components {
            for error in &component.errors {
                reasons.push(format!("{}: {}", component.name, error));
            }
        }

        for connection in self.connections() {
            match &connection.verdict {
                Verdict::Approved | Verdict::Skipped { .. } => {}
                Verdict::Unsupported { .. } => {
                    reasons.push(format!("{}: unsupported", connection.label));
                }
                Verdict::Blocked => {
                    let blocking = connection
                        .enforcement
                        .iter()
                        .flat_map(|e| e.violations.iter())
                        .filter(|v| {
                            v.severity.is_blocking()
                                || (self.warnings_as_errors && v.severity == Severity::Warning)
                        });
                    for violation in blocking {
                        reasons.push(format!("{}: {}", connection.label, violation));
                    }
                }
            }
        }
        reasons
    }

    /// Every mandatory action attached to an approved connection, in order.
    pub fn provisioning_actions(&self) -> Vec<&ComplianceAction> {
        self.connections()
            .filter(|c| c.verdict.is_approved())
            .filter_map(|c| c.enforcement.as_ref())
            .flat_map(|e| e.actions.iter())
            .collect()
    }

    /// Violations of `severity` across all evaluated connections.
    pub fn violation_count(&self, severity: Severity) -> usize {
        self.connections()
            .filter_map(|c| c.enforcement.as_ref())
            .map(|e| e.count(severity))
            .sum()
    }

    pub fn resolved_components(&self) -> impl Iterator<Item = &ResolvedConfig> {
        self.components.iter().filter_map(|c| c.resolved.as_ref())
    }
}
