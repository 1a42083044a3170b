//! Database component
//!
//! A managed relational database. Instance size, multi-AZ, port and backup
//! retention are derived when the layers leave them unset.

use serde_json::json;

use crate::domain::entities::{CapabilityData, EncryptionState, NetworkExposure, Schema};
use crate::domain::ports::{ComponentDefinition, NormalizeContext};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

use super::{insert_if_absent, normalize_name, resource_arn};

pub const ENGINES: &[&str] = &["postgres", "mysql"];

const NAME_MAX: usize = 63;

pub struct DatabaseComponent {
    schema: Schema,
}

impl DatabaseComponent {
    pub fn new() -> Self {
        let schema = Schema::object()
            .deny_unknown()
            .describe("Relational database")
            .property("name", Schema::string().min_length(1).max_length(NAME_MAX))
            .required_property("engine", Schema::enumeration(ENGINES.iter().copied()))
            .property("engine_version", Schema::string())
            .property("instance_class", Schema::string().min_length(1))
            .property(
                "allocated_storage_gb",
                Schema::integer().range(20.0, 65536.0).with_default(20),
            )
            .property("multi_az", Schema::boolean())
            .property("port", Schema::integer().range(1.0, 65535.0))
            .property(
                "publicly_accessible",
                Schema::boolean().with_default(false),
            )
            .property("allowed_cidrs", Schema::array(Schema::string()))
            .property("require_tls", Schema::boolean().with_default(true))
            .property("iam_auth", Schema::boolean().with_default(false))
            .property("backup_retention_days", Schema::integer().range(0.0, 35.0))
            .property(
                "encryption",
                Schema::object()
                    .deny_unknown()
                    .property("at_rest", Schema::boolean().with_default(true))
                    .property("kms_key_id", Schema::string().min_length(1)),
            );
        Self { schema }
    }

    /// Size tier derived from the framework.
    pub fn instance_class_for(framework: ComplianceFramework) -> &'static str {
        match framework {
            ComplianceFramework::Commercial => "db.t3.micro",
            ComplianceFramework::FedrampModerate => "db.r6g.large",
            ComplianceFramework::FedrampHigh => "db.r6g.xlarge",
        }
    }

    pub fn backup_retention_for(framework: ComplianceFramework) -> i64 {
        match framework {
            ComplianceFramework::Commercial => 7,
            ComplianceFramework::FedrampModerate => 14,
            ComplianceFramework::FedrampHigh => 35,
        }
    }

    /// Multi-AZ is required for FedRAMP frameworks and production environments.
    pub fn multi_az_for(framework: ComplianceFramework, environment: &str) -> bool {
        framework.is_fedramp() || matches!(environment, "prod" | "production")
    }

    pub fn default_port(engine: &str) -> i64 {
        match engine {
            "mysql" => 3306,
            _ => 5432,
        }
    }
}

impl Default for DatabaseComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDefinition for DatabaseComponent {
    fn component_type(&self) -> &str {
        "database"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn hardcoded_fallback(&self) -> ConfigValue {
        ConfigValue::from(json!({
            "engine": "postgres",
            "publicly_accessible": false,
            "allowed_cidrs": [],
        }))
    }

    fn normalize(&self, config: &mut ConfigValue, ctx: &NormalizeContext) {
        normalize_name(config, &ctx.component_name, NAME_MAX);

        let port = config
            .get("engine")
            .and_then(ConfigValue::as_str)
            .map(Self::default_port)
            .unwrap_or(5432);
        insert_if_absent(config, "port", port);
        insert_if_absent(
            config,
            "instance_class",
            Self::instance_class_for(ctx.framework),
        );
        insert_if_absent(
            config,
            "multi_az",
            Self::multi_az_for(ctx.framework, &ctx.environment),
        );
        insert_if_absent(
            config,
            "backup_retention_days",
            Self::backup_retention_for(ctx.framework),
        );
    }

    fn capability_data(&self, name: &str, capability: &str, config: &ConfigValue) -> CapabilityData {
        let db = config.get("name").and_then(ConfigValue::as_str).unwrap_or(name);
        let allowed_cidrs: Vec<String> = config
            .get("allowed_cidrs")
            .and_then(ConfigValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(ConfigValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let port = config
            .get("port")
            .and_then(ConfigValue::as_i64)
            .and_then(|p| u16::try_from(p).ok());

        CapabilityData {
            capability: capability.to_string(),
            resources: vec![resource_arn("rds", &format!("db:{}", db))],
            network: NetworkExposure {
                publicly_accessible: config
                    .get("publicly_accessible")
                    .and_then(ConfigValue::as_bool)
                    .unwrap_or(false),
                allowed_cidrs,
                port,
            },
            encryption: EncryptionState {
                at_rest: config
                    .lookup("encryption.at_rest")
                    .and_then(ConfigValue::as_bool)
                    .unwrap_or(false),
                in_transit: config
                    .get("require_tls")
                    .and_then(ConfigValue::as_bool)
                    .unwrap_or(false),
                customer_managed_key: config.lookup("encryption.kms_key_id").is_some(),
            },
        }
    }
}
