//! Queue component
//!
//! A managed message queue. FIFO queues carry a `.fifo` name suffix.

use serde_json::json;

use crate::domain::entities::{CapabilityData, EncryptionState, NetworkExposure, Schema};
use crate::domain::ports::{ComponentDefinition, NormalizeContext};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

use super::{insert_if_absent, normalize_name, resource_arn};

pub const FIFO_SUFFIX: &str = ".fifo";

const NAME_MAX: usize = 80;

pub struct QueueComponent {
    schema: Schema,
}

impl QueueComponent {
    pub fn new() -> Self {
        let schema = Schema::object()
            .deny_unknown()
            .describe("Message queue")
            .property("name", Schema::string().min_length(1).max_length(NAME_MAX))
            .required_property("fifo", Schema::boolean())
            .property(
                "visibility_timeout_seconds",
                Schema::integer().range(0.0, 43200.0).with_default(30),
            )
            .property(
                "message_retention_seconds",
                Schema::integer()
                    .range(60.0, 1_209_600.0)
                    .with_default(345_600),
            )
            .property(
                "dead_letter",
                Schema::object()
                    .deny_unknown()
                    .property("enabled", Schema::boolean().with_default(true))
                    .property(
                        "max_receive_count",
                        Schema::integer().range(1.0, 1000.0).with_default(3),
                    ),
            )
            .property("encryption", Schema::enumeration(["sqs-managed", "kms"]))
            .property("kms_key_id", Schema::string().min_length(1));
        Self { schema }
    }

    /// Encryption mode derived from the framework when not set.
    pub fn encryption_for(framework: ComplianceFramework) -> &'static str {
        if framework.is_fedramp() {
            "kms"
        } else {
            "sqs-managed"
        }
    }
}

impl Default for QueueComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDefinition for QueueComponent {
    fn component_type(&self) -> &str {
        "queue"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn hardcoded_fallback(&self) -> ConfigValue {
        ConfigValue::from(json!({
            "fifo": false,
            "visibility_timeout_seconds": 30,
        }))
    }

    fn normalize(&self, config: &mut ConfigValue, ctx: &NormalizeContext) {
        let fifo = config.get("fifo").and_then(ConfigValue::as_bool).unwrap_or(false);
        if fifo {
            let raw = config
                .get("name")
                .and_then(ConfigValue::as_str)
                .unwrap_or(ctx.component_name.as_str());
            let base = raw.strip_suffix(FIFO_SUFFIX).unwrap_or(raw).to_string();
            config.insert("name", base);
            normalize_name(config, &ctx.component_name, NAME_MAX - FIFO_SUFFIX.len());
            let name = config
                .get("name")
                .and_then(ConfigValue::as_str)
                .filter(|n| !n.is_empty())
                .map(|n| format!("{}{}", n, FIFO_SUFFIX))
                .unwrap_or_default();
            config.insert("name", name);
        } else {
            normalize_name(config, &ctx.component_name, NAME_MAX);
        }
        insert_if_absent(config, "encryption", Self::encryption_for(ctx.framework));
    }

    fn capability_data(&self, name: &str, capability: &str, config: &ConfigValue) -> CapabilityData {
        let queue = config.get("name").and_then(ConfigValue::as_str).unwrap_or(name);
        CapabilityData {
            capability: capability.to_string(),
            resources: vec![resource_arn("sqs", queue)],
            network: NetworkExposure::default(),
            encryption: EncryptionState {
                at_rest: true,
                in_transit: true,
                customer_managed_key: config.lookup("encryption").and_then(ConfigValue::as_str)
                    == Some("kms")
                    && config.get("kms_key_id").is_some(),
            },
        }
    }
}
