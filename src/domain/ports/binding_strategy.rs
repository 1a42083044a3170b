//! Binding and trigger strategy ports
//!
//! A strategy owns the wiring logic for the pairings it declares. The
//! registry only uses the declarations to answer lookups.

use crate::domain::entities::{
    CompatibilityEntry, EnhancedBindingContext, TriggerEntry, WiringPlan,
};

pub trait BindingStrategy: Send + Sync {
    /// Stable identifier used in reports.
    fn name(&self) -> &str;

    /// Pairings this strategy declares.
    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry>;

    /// Whether this strategy handles `capability` requested from `source_type`.
    ///
    /// Defaults to a scan of [`BindingStrategy::compatibility_matrix`].
    fn can_handle(&self, source_type: &str, capability: &str) -> bool {
        self.compatibility_matrix()
            .iter()
            .any(|e| e.source_type == source_type && e.capability == capability)
    }

    /// Wiring the provisioning backend must apply for an approved binding.
    fn plan_wiring(&self, context: &EnhancedBindingContext) -> WiringPlan;
}

pub trait TriggerStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn trigger_matrix(&self) -> Vec<TriggerEntry>;

    fn can_handle(&self, source_type: &str, target_type: &str, event_type: &str) -> bool {
        self.trigger_matrix().iter().any(|e| {
            e.source_type == source_type
                && e.target_type == target_type
                && e.event_type == event_type
        })
    }

    fn plan_wiring(&self, context: &EnhancedBindingContext) -> WiringPlan;
}
