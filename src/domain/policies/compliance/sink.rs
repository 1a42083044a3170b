//! Collector handed to each rule.

use crate::domain::entities::{ComplianceAction, ComplianceViolation};
use crate::domain::ports::EnforcementSink;
use crate::domain::value_objects::ComplianceFramework;

/// Output of a single rule. Discarded when the rule fails.
#[derive(Debug, Clone)]
pub struct RuleOutput {
    framework: ComplianceFramework,
    pub violations: Vec<ComplianceViolation>,
    pub actions: Vec<ComplianceAction>,
}

impl RuleOutput {
    pub fn new(framework: ComplianceFramework) -> Self {
        Self {
            framework,
            violations: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty() && self.actions.is_empty()
    }
}

impl EnforcementSink for RuleOutput {
    fn add_violation(&mut self, violation: ComplianceViolation) {
        self.violations.push(violation);
    }

    fn add_action(&mut self, action: ComplianceAction) {
        self.actions.push(action);
    }

    fn framework(&self) -> ComplianceFramework {
        self.framework
    }
}
