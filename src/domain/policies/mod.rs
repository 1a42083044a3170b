//! Domain Policies
//!
//! Business rules that judge proposed bindings. Pure functions over domain
//! entities.

pub mod compliance;

pub use compliance::{ComplianceEnforcer, FnRule, RuleOutput, DEFAULT_REQUIRED_TAGS};
