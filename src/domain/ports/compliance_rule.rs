//! ComplianceRule port
//!
//! A rule inspects one binding context and reports through a sink.

use crate::domain::entities::{
    ActionKind, ComplianceAction, ComplianceViolation, EnhancedBindingContext, Severity,
};
use crate::domain::value_objects::ComplianceFramework;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("missing context field '{field}'")]
    MissingField { field: String },

    #[error("{0}")]
    Failed(String),
}

/// Collector for rule output.
pub trait EnforcementSink {
    fn add_violation(&mut self, violation: ComplianceViolation);

    fn add_action(&mut self, action: ComplianceAction);

    /// Framework stamped on everything reported through the helpers.
    fn framework(&self) -> ComplianceFramework;

    fn report(
        &mut self,
        rule_id: &str,
        kind: &str,
        severity: Severity,
        description: &str,
        remediation: &str,
    ) {
        let framework = self.framework();
        self.add_violation(ComplianceViolation {
            kind: kind.to_string(),
            severity,
            description: description.to_string(),
            rule_id: rule_id.to_string(),
            framework,
            remediation: remediation.to_string(),
            context: None,
        });
    }

    fn require(&mut self, kind: ActionKind, description: &str, details: &[(&str, &str)]) {
        let framework = self.framework();
        self.add_action(ComplianceAction {
            kind,
            description: description.to_string(),
            framework,
            details: details
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }
}

pub trait ComplianceRule: Send + Sync {
    fn id(&self) -> &str;

    fn evaluate(
        &self,
        context: &EnhancedBindingContext,
        sink: &mut dyn EnforcementSink,
    ) -> Result<(), RuleError>;
}
