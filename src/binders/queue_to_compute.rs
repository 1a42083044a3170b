//! Queue → worker triggers

use crate::components::resource_arn;
use crate::domain::entities::{
    AccessGrant, EnhancedBindingContext, EventSourceMapping, TriggerEntry, WiringPlan,
};
use crate::domain::ports::TriggerStrategy;

use super::resource_name;

pub const MESSAGE: &str = "message";

pub const DEFAULT_BATCH_SIZE: u32 = 10;

pub struct QueueToComputeTrigger;

impl TriggerStrategy for QueueToComputeTrigger {
    fn name(&self) -> &str {
        "queue-to-compute"
    }

    fn trigger_matrix(&self) -> Vec<TriggerEntry> {
        vec![TriggerEntry::new(
            "queue",
            "worker",
            MESSAGE,
            "Invoke the worker for each batch of messages",
        )]
    }

    fn plan_wiring(&self, ctx: &EnhancedBindingContext) -> WiringPlan {
        let queue = resource_name(&ctx.source.name, &ctx.source.config);

        let mut plan = WiringPlan::default();
        plan.grants.push(AccessGrant {
            actions: vec![
                "sqs:ReceiveMessage".into(),
                "sqs:DeleteMessage".into(),
                "sqs:GetQueueAttributes".into(),
            ],
            resources: vec![resource_arn("sqs", queue)],
        });
        plan.event_sources.push(EventSourceMapping {
            source: ctx.source.name.clone(),
            target: ctx.target.name.clone(),
            event_type: MESSAGE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        });
        plan
    }
}
