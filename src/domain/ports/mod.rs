//! Domain Ports (Interfaces)
//!
//! These traits define the seams between the engine and the code that plugs
//! into it: component types, wiring strategies and compliance rules.

pub mod binding_strategy;
pub mod compliance_rule;
pub mod component_definition;

pub use binding_strategy::{BindingStrategy, TriggerStrategy};
pub use compliance_rule::{ComplianceRule, EnforcementSink, RuleError};
pub use component_definition::{ComponentDefinition, NormalizeContext};
