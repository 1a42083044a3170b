//! Built-in component types
//!
//! Each type supplies a schema, a hardcoded fallback that satisfies the
//! schema on its own, a normaliser and the capability data it publishes to
//! binding sources.

pub mod database;
pub mod queue;
pub mod worker;

pub use database::DatabaseComponent;
pub use queue::QueueComponent;
pub use worker::WorkerComponent;

use crate::domain::ports::ComponentDefinition;
use crate::domain::services::sanitize_resource_name;
use crate::domain::value_objects::ConfigValue;

/// All built-in component definitions, in a fixed order.
pub fn all_components() -> Vec<Box<dyn ComponentDefinition>> {
    vec![
        Box::new(WorkerComponent::new()),
        Box::new(QueueComponent::new()),
        Box::new(DatabaseComponent::new()),
    ]
}

/// Resource identifier with region and account left as provisioning placeholders.
pub fn resource_arn(service: &str, resource: &str) -> String {
    format!("arn:aws:{}:${{region}}:${{account}}:{}", service, resource)
}

/// Sanitise `config.name`, falling back to the component instance name.
pub(crate) fn normalize_name(config: &mut ConfigValue, component_name: &str, max_len: usize) {
    let raw = config
        .get("name")
        .and_then(ConfigValue::as_str)
        .unwrap_or(component_name)
        .to_string();
    config.insert("name", sanitize_resource_name(&raw, max_len));
}

/// Set `key` only when it is absent.
pub(crate) fn insert_if_absent(config: &mut ConfigValue, key: &str, value: impl Into<ConfigValue>) {
    if config.get(key).is_none() {
        config.insert(key, value);
    }
}
