//! Worker → database bindings

use crate::domain::entities::{
    AccessGrant, CompatibilityEntry, EnhancedBindingContext, NetworkRule, WiringPlan,
};
use crate::domain::ports::BindingStrategy;
use crate::domain::value_objects::ConfigValue;

use super::{env_prefix, resource_name};

pub const READ: &str = "db:read";
pub const WRITE: &str = "db:write";
pub const READ_WRITE: &str = "db:read-write";

pub struct ComputeToDatabaseBinder;

impl BindingStrategy for ComputeToDatabaseBinder {
    fn name(&self) -> &str {
        "compute-to-database"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        vec![
            CompatibilityEntry::new("worker", "database", READ, "Read-only connection"),
            CompatibilityEntry::new("worker", "database", WRITE, "Write connection"),
            CompatibilityEntry::new("worker", "database", READ_WRITE, "Read-write connection"),
        ]
    }

    fn plan_wiring(&self, ctx: &EnhancedBindingContext) -> WiringPlan {
        let db = resource_name(&ctx.target.name, &ctx.target.config);
        let prefix = env_prefix(&ctx.target.name);
        let port = ctx.target_capability_data.network.port.unwrap_or(5432);

        let mut plan = WiringPlan::default();
        plan.environment
            .insert(format!("{}_HOST", prefix), format!("${{{}.endpoint}}", db));
        plan.environment
            .insert(format!("{}_PORT", prefix), port.to_string());
        if let Some(engine) = ctx.target.config.get("engine").and_then(ConfigValue::as_str) {
            plan.environment
                .insert(format!("{}_ENGINE", prefix), engine.to_string());
        }

        if ctx.options.iam_auth {
            plan.grants.push(AccessGrant {
                actions: vec!["rds-db:connect".into()],
                resources: ctx.target_capability_data.resources.clone(),
            });
        } else {
            let secret = format!("${{{}.secret_arn}}", db);
            plan.environment
                .insert(format!("{}_SECRET_ARN", prefix), secret.clone());
            plan.grants.push(AccessGrant {
                actions: vec!["secretsmanager:GetSecretValue".into()],
                resources: vec![secret],
            });
        }

        plan.network_rules.push(NetworkRule {
            from: ctx.source.name.clone(),
            to: ctx.target.name.clone(),
            port,
            protocol: "tcp".into(),
        });
        plan
    }
}
