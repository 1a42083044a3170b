//! Compliance enforcement policy

mod enforcer;
mod rules;
mod sink;

pub use enforcer::{ComplianceEnforcer, DEFAULT_REQUIRED_TAGS};
pub use rules::{
    baseline_rules, cross_posture_rules, enhanced_rules, maximum_rules, CheckFn, FnRule,
    TraceabilityTags,
};
pub use sink::RuleOutput;
