//! Compliance entities
//!
//! Violations and actions produced by enforcement, and the per-binding
//! `EnforcementResult` that collects them.

use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::ComplianceFramework;

/// Violation kind reserved for rules that failed internally.
pub const INTERNAL_ERROR_KIND: &str = "internal-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceViolation {
    /// Category, e.g. `encryption`, `network-exposure`, `internal-error`.
    pub kind: String,
    pub severity: Severity,
    pub description: String,
    pub rule_id: String,
    pub framework: ComplianceFramework,
    pub remediation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ComplianceViolation {
    pub fn is_internal_error(&self) -> bool {
        self.kind == INTERNAL_ERROR_KIND
    }
}

impl fmt::Display for ComplianceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule_id, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Policy,
    Restriction,
    Monitoring,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Policy => "policy",
            ActionKind::Restriction => "restriction",
            ActionKind::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mandatory instruction for the provisioning backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceAction {
    pub kind: ActionKind,
    pub description: String,
    pub framework: ComplianceFramework,
    /// Free-form key/value details, in insertion order.
    pub details: Vec<(String, String)>,
}

impl ComplianceAction {
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnforcementMetadata {
    pub framework: ComplianceFramework,
    /// Label of the evaluated binding.
    pub binding: String,
    /// Rule ids in evaluation order.
    pub rules_evaluated: Vec<String>,
    pub failed_rules: usize,
}

/// Outcome of one enforcement pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnforcementResult {
    pub compliant: bool,
    pub violations: Vec<ComplianceViolation>,
    pub actions: Vec<ComplianceAction>,
    pub metadata: EnforcementMetadata,
}

impl EnforcementResult {
    pub fn new(
        violations: Vec<ComplianceViolation>,
        actions: Vec<ComplianceAction>,
        metadata: EnforcementMetadata,
    ) -> Self {
        let compliant = !violations.iter().any(|v| v.severity.is_blocking());
        Self {
            compliant,
            violations,
            actions,
            metadata,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ComplianceViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    pub fn violations_for(&self, rule_id: &str) -> Vec<&ComplianceViolation> {
        self.violations
            .iter()
            .filter(|v| v.rule_id == rule_id)
            .collect()
    }
}
