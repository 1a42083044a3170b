//! Worker → queue bindings

use crate::domain::entities::{
    AccessGrant, CompatibilityEntry, EnhancedBindingContext, WiringPlan,
};
use crate::domain::ports::BindingStrategy;

use super::{env_prefix, resource_name};

pub const PUBLISH: &str = "queue:publish";
pub const CONSUME: &str = "queue:consume";

pub struct ComputeToQueueBinder;

impl BindingStrategy for ComputeToQueueBinder {
    fn name(&self) -> &str {
        "compute-to-queue"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        vec![
            CompatibilityEntry::new("worker", "queue", PUBLISH, "Send messages to the queue"),
            CompatibilityEntry::new("worker", "queue", CONSUME, "Poll and delete messages"),
        ]
    }

    fn plan_wiring(&self, ctx: &EnhancedBindingContext) -> WiringPlan {
        let queue = resource_name(&ctx.target.name, &ctx.target.config);
        let prefix = env_prefix(&ctx.target.name);

        let mut actions: Vec<String> = match ctx.target_capability_data.capability.as_str() {
            CONSUME => vec![
                "sqs:ReceiveMessage".into(),
                "sqs:DeleteMessage".into(),
                "sqs:ChangeMessageVisibility".into(),
                "sqs:GetQueueAttributes".into(),
            ],
            _ => vec!["sqs:SendMessage".into(), "sqs:GetQueueAttributes".into()],
        };
        if ctx.target_capability_data.encryption.customer_managed_key {
            actions.push("kms:GenerateDataKey".into());
            actions.push("kms:Decrypt".into());
        }

        let mut plan = WiringPlan::default();
        plan.environment
            .insert(format!("{}_QUEUE_URL", prefix), format!("${{{}.url}}", queue));
        plan.environment
            .insert(format!("{}_QUEUE_NAME", prefix), queue.to_string());
        plan.grants.push(AccessGrant {
            actions,
            resources: ctx.target_capability_data.resources.clone(),
        });
        plan
    }
}
