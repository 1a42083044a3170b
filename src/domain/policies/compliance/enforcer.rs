//! Compliance enforcer
//!
//! Posture-keyed rule table. Each framework runs the rules of every tier up
//! to its own, in declaration order, then the cross-posture rules. A rule
//! that errors or panics becomes an `internal-error` violation and the pass
//! continues. Panics inside a rule are reported through the result and the
//! log, not through the process panic hook.

use std::any::Any;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Once;

use tracing::{debug, warn};

use crate::domain::entities::{
    ComplianceViolation, EnforcementMetadata, EnforcementResult, EnhancedBindingContext, Severity,
    INTERNAL_ERROR_KIND,
};
use crate::domain::ports::ComplianceRule;
use crate::domain::value_objects::ComplianceFramework;

use super::rules::{baseline_rules, cross_posture_rules, enhanced_rules, maximum_rules};
use super::sink::RuleOutput;

thread_local! {
    static IN_RULE: Cell<bool> = const { Cell::new(false) };
}

static RULE_PANIC_HOOK: Once = Once::new();

/// Wraps the current panic hook so it stays silent while this thread is
/// evaluating a rule.
fn install_rule_panic_hook() {
    RULE_PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if !in_rule_scope() {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as inside a rule until dropped.
struct RuleScope;

impl RuleScope {
    fn enter() -> Self {
        IN_RULE.with(|flag| flag.set(true));
        RuleScope
    }
}

impl Drop for RuleScope {
    fn drop(&mut self) {
        IN_RULE.with(|flag| flag.set(false));
    }
}

fn in_rule_scope() -> bool {
    IN_RULE.with(Cell::get)
}

/// Tags every binding must carry unless configured otherwise.
pub const DEFAULT_REQUIRED_TAGS: &[&str] = &["service", "owner"];

#[derive(Default)]
pub struct ComplianceEnforcer {
    /// Rules introduced at each tier.
    tiers: BTreeMap<ComplianceFramework, Vec<Box<dyn ComplianceRule>>>,
    cross_posture: Vec<Box<dyn ComplianceRule>>,
}

impl ComplianceEnforcer {
    /// No rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rule table.
    pub fn standard(required_tags: &[String]) -> Self {
        let mut enforcer = Self::empty();
        for rule in baseline_rules() {
            enforcer = enforcer.with_posture_rule(ComplianceFramework::Commercial, rule);
        }
        for rule in enhanced_rules() {
            enforcer = enforcer.with_posture_rule(ComplianceFramework::FedrampModerate, rule);
        }
        for rule in maximum_rules() {
            enforcer = enforcer.with_posture_rule(ComplianceFramework::FedrampHigh, rule);
        }
        enforcer.cross_posture = cross_posture_rules(required_tags);
        enforcer
    }

    /// Add a rule introduced at `framework`. Stricter frameworks inherit it.
    pub fn with_posture_rule<R>(mut self, framework: ComplianceFramework, rule: R) -> Self
    where
        R: ComplianceRule + 'static,
    {
        self.tiers.entry(framework).or_default().push(Box::new(rule));
        self
    }

    pub fn with_cross_posture_rule<R>(mut self, rule: R) -> Self
    where
        R: ComplianceRule + 'static,
    {
        self.cross_posture.push(Box::new(rule));
        self
    }

    fn rules_for(&self, framework: ComplianceFramework) -> Vec<&dyn ComplianceRule> {
        self.tiers
            .range(..=framework)
            .flat_map(|(_, rules)| rules.iter())
            .chain(self.cross_posture.iter())
            .map(|rule| rule.as_ref() as &dyn ComplianceRule)
            .collect()
    }

    /// Rule ids evaluated for `framework`, in order.
    pub fn rule_ids_for(&self, framework: ComplianceFramework) -> Vec<String> {
        self.rules_for(framework)
            .into_iter()
            .map(|r| r.id().to_string())
            .collect()
    }

    pub fn enforce(&self, context: &EnhancedBindingContext) -> EnforcementResult {
        let framework = context.compliance_framework;
        let binding = context.label();
        let mut violations = Vec::new();
        let mut actions = Vec::new();
        let mut rules_evaluated = Vec::new();
        let mut failed_rules = 0;
        install_rule_panic_hook();

        for rule in self.rules_for(framework) {
            rules_evaluated.push(rule.id().to_string());
            let mut output = RuleOutput::new(framework);
            let outcome = {
                let _scope = RuleScope::enter();
                catch_unwind(AssertUnwindSafe(|| rule.evaluate(context, &mut output)))
            };

            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };

            match failure {
                None => {
                    violations.extend(output.violations);
                    actions.extend(output.actions);
                }
                Some(message) => {
                    failed_rules += 1;
                    warn!(rule = rule.id(), binding = %binding, error = %message, "compliance rule failed");
                    violations.push(internal_error(rule.id(), framework, &message));
                }
            }
        }

        let result = EnforcementResult::new(
            violations,
            actions,
            EnforcementMetadata {
                framework,
                binding,
                rules_evaluated,
                failed_rules,
            },
        );
        debug!(
            binding = %result.metadata.binding,
            framework = %framework,
            compliant = result.compliant,
            violations = result.violations.len(),
            actions = result.actions.len(),
            "enforcement finished"
        );
        result
    }
}

impl fmt::Debug for ComplianceEnforcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiers: BTreeMap<&str, Vec<&str>> = self
            .tiers
            .iter()
            .map(|(fw, rules)| (fw.as_str(), rules.iter().map(|r| r.id()).collect()))
            .collect();
        let cross: Vec<&str> = self.cross_posture.iter().map(|r| r.id()).collect();
        f.debug_struct("ComplianceEnforcer")
            .field("tiers", &tiers)
            .field("cross_posture", &cross)
            .finish()
    }
}

fn internal_error(rule_id: &str, framework: ComplianceFramework, message: &str) -> ComplianceViolation {
    ComplianceViolation {
        kind: INTERNAL_ERROR_KIND.to_string(),
        severity: Severity::Error,
        description: format!("rule '{}' failed: {}", rule_id, message),
        rule_id: rule_id.to_string(),
        framework,
        remediation: "Fix the rule implementation; its checks were not applied".to_string(),
        context: None,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_string()
    }
}
