//! Worker component
//!
//! A compute function. Binding source for queues and databases, trigger
//! target for queues.

use serde_json::json;

use crate::domain::entities::{CapabilityData, EncryptionState, NetworkExposure, Schema};
use crate::domain::ports::{ComponentDefinition, NormalizeContext};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

use super::{insert_if_absent, normalize_name, resource_arn};

pub const RUNTIMES: &[&str] = &["nodejs20.x", "python3.12", "java21", "provided.al2023"];

const NAME_MAX: usize = 64;

pub struct WorkerComponent {
    schema: Schema,
}

impl WorkerComponent {
    pub fn new() -> Self {
        let schema = Schema::object()
            .deny_unknown()
            .describe("Compute function")
            .property("name", Schema::string().min_length(1).max_length(NAME_MAX))
            .required_property("runtime", Schema::enumeration(RUNTIMES.iter().copied()))
            .required_property("handler", Schema::string().min_length(1))
            .property(
                "memory_mb",
                Schema::integer().range(128.0, 10240.0).with_default(512),
            )
            .property(
                "timeout_seconds",
                Schema::integer().range(1.0, 900.0).with_default(30),
            )
            .property("environment", Schema::object())
            .property("tracing", Schema::boolean())
            .property("log_retention_days", Schema::integer().range(1.0, 3653.0))
            .property("kms_key_id", Schema::string().min_length(1))
            .property(
                "vpc",
                Schema::object()
                    .deny_unknown()
                    .property("enabled", Schema::boolean().with_default(false))
                    .property("subnet_ids", Schema::array(Schema::string())),
            );
        Self { schema }
    }

    /// Log retention derived from the framework when not set.
    pub fn log_retention_for(framework: ComplianceFramework) -> i64 {
        match framework {
            ComplianceFramework::Commercial => 30,
            ComplianceFramework::FedrampModerate => 90,
            ComplianceFramework::FedrampHigh => 365,
        }
    }
}

impl Default for WorkerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDefinition for WorkerComponent {
    fn component_type(&self) -> &str {
        "worker"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn hardcoded_fallback(&self) -> ConfigValue {
        ConfigValue::from(json!({
            "runtime": "nodejs20.x",
            "handler": "index.handler",
            "memory_mb": 512,
            "timeout_seconds": 30,
        }))
    }

    fn normalize(&self, config: &mut ConfigValue, ctx: &NormalizeContext) {
        normalize_name(config, &ctx.component_name, NAME_MAX);
        insert_if_absent(config, "tracing", ctx.framework.is_fedramp());
        insert_if_absent(
            config,
            "log_retention_days",
            Self::log_retention_for(ctx.framework),
        );
    }

    fn capability_data(&self, name: &str, capability: &str, config: &ConfigValue) -> CapabilityData {
        let function = config.get("name").and_then(ConfigValue::as_str).unwrap_or(name);
        CapabilityData {
            capability: capability.to_string(),
            resources: vec![resource_arn("lambda", &format!("function:{}", function))],
            network: NetworkExposure::default(),
            encryption: EncryptionState {
                at_rest: true,
                in_transit: true,
                customer_managed_key: config.get("kms_key_id").is_some(),
            },
        }
    }
}
