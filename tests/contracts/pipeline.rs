//! Synthesis contracts (PIPELINE-001 through PIPELINE-004)

use std::path::Path;
use std::sync::Arc;

use stratus::application::ComponentCatalog;
use stratus::components::{QueueComponent, WorkerComponent};
use stratus::config::parse_with_warnings;
use stratus::domain::entities::{EnhancedBindingContext, INTERNAL_ERROR_KIND};
use stratus::domain::policies::FnRule;
use stratus::domain::ports::{EnforcementSink, RuleError};
use stratus::{
    BinderRegistry, ComplianceEnforcer, EngineConfig, Manifest, StratusError, SynthesisPipeline,
    Verdict,
};

use crate::common::*;

const ENGINE_TOML: &str = r#"
[platform.defaults.worker]
memory_mb = 1024
tracing = true

[posture.commercial.worker]
timeout_seconds = 60

[environments.prod.worker]
memory_mb = 2048
"#;

fn sealed() -> Arc<BinderRegistry> {
    Arc::new(BinderRegistry::with_builtin_strategies().sealed())
}

fn plan_with(config: EngineConfig, yaml: &str) -> stratus::SynthesisPlan {
    SynthesisPipeline::new(sealed(), config)
        .unwrap()
        .plan(&Manifest::from_yaml_str(yaml).unwrap())
}

/// CONTRACT PIPELINE-001: Registry Must Be Sealed
mod sealed_registry {
    use super::*;

    #[test]
    fn contract_pipeline_refuses_open_registry() {
        let open = Arc::new(BinderRegistry::with_builtin_strategies());
        let err = SynthesisPipeline::new(open, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, StratusError::RegistryNotSealed));
    }
}

/// CONTRACT PIPELINE-002: Engine Layers Reach Every Instance Independently
mod layering {
    use super::*;

    #[test]
    fn contract_engine_config_feeds_the_layer_stack() {
        let (config, warnings) =
            parse_with_warnings(ENGINE_TOML, Path::new("stratus.toml")).unwrap();
        assert!(warnings.is_empty());

        let plan = plan_with(
            config,
            r#"
service: orders
owner: payments
environment: prod
components:
  - name: api
    type: worker
  - name: jobs
    type: worker
    config:
      memory_mb: 4096
"#,
        );

        let api = plan.components[0].resolved.as_ref().unwrap();
        assert_eq!(api.get("memory_mb").and_then(|v| v.as_i64()), Some(2048));
        assert_eq!(api.source_of("memory_mb"), Some("environment:prod"));
        assert_eq!(api.get("timeout_seconds").and_then(|v| v.as_i64()), Some(60));
        assert_eq!(api.source_of("timeout_seconds"), Some("compliance:commercial"));
        assert_eq!(api.get_bool("tracing"), Some(true));
        assert_eq!(api.source_of("tracing"), Some("platform"));

        let jobs = plan.components[1].resolved.as_ref().unwrap();
        assert_eq!(jobs.get("memory_mb").and_then(|v| v.as_i64()), Some(4096));
        assert_eq!(jobs.source_of("memory_mb"), Some("user"));
        assert_ne!(api.fingerprint, jobs.fingerprint);
    }

    #[test]
    fn contract_one_failure_does_not_stop_the_rest() {
        let plan = plan_with(
            EngineConfig::default(),
            r#"
service: orders
owner: payments
components:
  - name: broken
    type: worker
    config:
      memory_mb: 1
  - name: api
    type: worker
  - name: events
    type: queue
bindings:
  - from: broken
    to: events
    capability: queue:publish
  - from: api
    to: events
    capability: queue:publish
"#,
        );

        assert!(!plan.components[0].is_resolved());
        assert!(matches!(plan.bindings[0].verdict, Verdict::Skipped { .. }));
        assert_eq!(plan.bindings[1].verdict, Verdict::Approved);
        assert!(!plan.is_provisionable());
        assert_eq!(plan.blocking_reasons().len(), 1);
    }
}

/// CONTRACT PIPELINE-003: Plans Are Deterministic
mod determinism {
    use super::*;

    #[test]
    fn contract_same_inputs_same_plan() {
        let first = plan_with(EngineConfig::default(), ORDERS_MANIFEST);
        let second = plan_with(EngineConfig::default(), ORDERS_MANIFEST);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn contract_blocked_connections_emit_no_actions() {
        let plan = plan_with(EngineConfig::default(), AUDIT_DISABLED_MANIFEST);
        assert_eq!(plan.bindings[0].verdict, Verdict::Blocked);
        assert!(plan.bindings[0].wiring.is_none());
        assert!(plan.provisioning_actions().is_empty());
    }
}

fn needs_change_ticket(
    ctx: &EnhancedBindingContext,
    _sink: &mut dyn EnforcementSink,
) -> Result<(), RuleError> {
    if ctx.options.tags.contains_key("change-ticket") {
        Ok(())
    } else {
        Err(RuleError::MissingField {
            field: "change-ticket".to_string(),
        })
    }
}

/// CONTRACT PIPELINE-004: Injected Collaborators Are Used
///
/// A host-supplied enforcer and catalog replace the built-in ones for every
/// component and connection in the plan.
mod injected_collaborators {
    use super::*;

    #[test]
    fn contract_custom_enforcer_judges_every_connection() {
        let enforcer = ComplianceEnforcer::empty()
            .with_cross_posture_rule(FnRule::new("ops.change-ticket", needs_change_ticket));
        let plan = SynthesisPipeline::new(sealed(), EngineConfig::default())
            .unwrap()
            .with_enforcer(enforcer)
            .plan(&Manifest::from_yaml_str(ORDERS_MANIFEST).unwrap());

        for connection in plan.bindings.iter().chain(plan.triggers.iter()) {
            assert_eq!(connection.verdict, Verdict::Blocked, "{}", connection.label);
            let enforcement = connection.enforcement.as_ref().unwrap();
            assert_eq!(enforcement.metadata.rules_evaluated, vec!["ops.change-ticket"]);
            assert_eq!(enforcement.violations.len(), 1);
            assert_eq!(enforcement.violations[0].kind, INTERNAL_ERROR_KIND);
            assert!(enforcement.violations[0]
                .description
                .contains("missing context field 'change-ticket'"));
        }
    }

    #[test]
    fn contract_custom_catalog_limits_component_types() {
        let catalog = ComponentCatalog::new(vec![
            Box::new(WorkerComponent::new()),
            Box::new(QueueComponent::new()),
        ]);
        let plan = SynthesisPipeline::new(sealed(), EngineConfig::default())
            .unwrap()
            .with_catalog(catalog)
            .plan(&Manifest::from_yaml_str(ORDERS_MANIFEST).unwrap());

        assert!(plan.components[0].is_resolved());
        assert!(plan.components[1].is_resolved());
        assert!(!plan.components[2].is_resolved());
        assert!(plan.components[2].errors[0].contains("unknown component type 'database'"));
        assert_eq!(plan.bindings[0].verdict, Verdict::Approved);
        assert!(matches!(plan.bindings[1].verdict, Verdict::Skipped { .. }));
    }
}
