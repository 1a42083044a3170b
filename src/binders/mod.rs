//! Built-in wiring strategies

pub mod compute_to_database;
pub mod compute_to_queue;
pub mod queue_to_compute;

pub use compute_to_database::ComputeToDatabaseBinder;
pub use compute_to_queue::ComputeToQueueBinder;
pub use queue_to_compute::QueueToComputeTrigger;

use std::sync::Arc;

use crate::domain::ports::{BindingStrategy, TriggerStrategy};
use crate::domain::services::BinderRegistry;
use crate::domain::value_objects::ConfigValue;

/// Built-in binding strategies in lookup order.
pub fn builtin_binding_strategies() -> Vec<Arc<dyn BindingStrategy>> {
    vec![Arc::new(ComputeToQueueBinder), Arc::new(ComputeToDatabaseBinder)]
}

pub fn builtin_trigger_strategies() -> Vec<Arc<dyn TriggerStrategy>> {
    vec![Arc::new(QueueToComputeTrigger)]
}

impl BinderRegistry {
    /// Unsealed registry holding the built-in strategies, registered in a fixed order.
    pub fn with_builtin_strategies() -> Self {
        BinderRegistry::from_strategies(builtin_binding_strategies(), builtin_trigger_strategies())
    }
}

/// `orders-db` -> `ORDERS_DB`
pub(crate) fn env_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Physical resource name of an endpoint, defaulting to its instance name.
pub(crate) fn resource_name<'a>(instance: &'a str, config: &'a ConfigValue) -> &'a str {
    config
        .get("name")
        .and_then(ConfigValue::as_str)
        .unwrap_or(instance)
}
