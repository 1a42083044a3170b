//! Resolution contracts (RESOLVE-001 through RESOLVE-006)
//!
//! Priority: user > environment > compliance > platform > hardcoded fallback.

use serde_json::json;

use stratus::domain::entities::{CapabilityData, NORMALIZED_SOURCE, SCHEMA_DEFAULT_SOURCE};
use stratus::domain::ports::{ComponentDefinition, NormalizeContext};
use stratus::domain::services::ResolveError;
use stratus::{
    ComplianceFramework, ConfigLayer, ConfigResolver, ConfigValue, LayerKind, LayerStack,
    ResolvedConfig, Schema,
};

/// Minimal component type exercising every resolver stage.
struct CacheComponent {
    schema: Schema,
}

impl CacheComponent {
    fn new() -> Self {
        Self {
            schema: Schema::object()
                .deny_unknown()
                .required_property("engine", Schema::enumeration(["redis", "memcached"]))
                .property("size_mb", Schema::integer().range(64.0, 65536.0))
                .property("ttl", Schema::integer().range(1.0, 3600.0).with_default(60))
                .property("region", Schema::string())
                .property("labels", Schema::object()),
        }
    }
}

impl ComponentDefinition for CacheComponent {
    fn component_type(&self) -> &str {
        "cache"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn hardcoded_fallback(&self) -> ConfigValue {
        ConfigValue::from(json!({"engine": "redis", "size_mb": 128}))
    }

    fn normalize(&self, config: &mut ConfigValue, _ctx: &NormalizeContext) {
        let region = config
            .get("region")
            .and_then(ConfigValue::as_str)
            .map(str::to_lowercase);
        if let Some(region) = region {
            config.insert("region", region);
        }
    }

    fn capability_data(&self, _name: &str, capability: &str, _config: &ConfigValue) -> CapabilityData {
        CapabilityData {
            capability: capability.to_string(),
            ..CapabilityData::default()
        }
    }
}

fn layer(kind: LayerKind, value: serde_json::Value) -> ConfigLayer {
    ConfigLayer::new(kind, ConfigValue::from(value))
}

fn resolve(stack: &LayerStack) -> Result<ResolvedConfig, ResolveError> {
    ConfigResolver::new(&CacheComponent::new()).resolve(
        "sessions",
        stack,
        ComplianceFramework::Commercial,
        "dev",
    )
}

/// CONTRACT RESOLVE-001: Layer Priority Order
///
/// The highest-precedence layer that sets a leaf wins, whatever order the
/// layers were inserted in.
mod layer_priority {
    use super::*;

    #[test]
    fn contract_each_layer_beats_every_lower_layer() {
        let mut stack = LayerStack::new()
            .with_layer(layer(LayerKind::User, json!({"size_mb": 2048})))
            .with_layer(layer(LayerKind::Platform, json!({"size_mb": 256})))
            .with_layer(layer(LayerKind::Environment, json!({"size_mb": 1024})))
            .with_layer(layer(LayerKind::Compliance, json!({"size_mb": 512})));

        let expected = [
            (2048, "user"),
            (1024, "environment"),
            (512, "compliance"),
            (256, "platform"),
            (128, "hardcoded-fallback"),
        ];
        let removal_order = [
            LayerKind::User,
            LayerKind::Environment,
            LayerKind::Compliance,
            LayerKind::Platform,
        ];

        for (idx, (size, source)) in expected.iter().enumerate() {
            let resolved = resolve(&stack).unwrap();
            assert_eq!(
                resolved.get("size_mb"),
                Some(&ConfigValue::Integer(*size)),
                "with layers {:?}",
                stack.names()
            );
            assert_eq!(resolved.source_of("size_mb"), Some(*source));
            if let Some(kind) = removal_order.get(idx) {
                stack.remove(*kind);
            }
        }
    }

    #[test]
    fn contract_null_never_erases_a_lower_value() {
        let stack = LayerStack::new()
            .with_layer(layer(LayerKind::Platform, json!({"region": "us-east-1"})))
            .with_layer(layer(LayerKind::User, json!({"region": null, "size_mb": null})));

        let resolved = resolve(&stack).unwrap();
        assert_eq!(resolved.get_str("region"), Some("us-east-1"));
        assert_eq!(resolved.source_of("region"), Some("platform"));
        assert_eq!(resolved.get("size_mb"), Some(&ConfigValue::Integer(128)));
    }

    #[test]
    fn contract_nested_objects_merge_key_by_key() {
        let stack = LayerStack::new()
            .with_layer(layer(
                LayerKind::Platform,
                json!({"labels": {"team": "core", "tier": "gold"}}),
            ))
            .with_layer(layer(LayerKind::User, json!({"labels": {"tier": "silver"}})));

        let resolved = resolve(&stack).unwrap();
        assert_eq!(resolved.get_str("labels.team"), Some("core"));
        assert_eq!(resolved.get_str("labels.tier"), Some("silver"));
        assert_eq!(resolved.source_of("labels.team"), Some("platform"));
        assert_eq!(resolved.source_of("labels.tier"), Some("user"));
    }
}

/// CONTRACT RESOLVE-002: Shape Conflicts Fail Loudly
///
/// Object vs array vs scalar disagreements are never coerced, and every
/// conflict is reported in one pass.
mod shape_conflicts {
    use super::*;

    #[test]
    fn contract_all_conflicts_are_collected() {
        let stack = LayerStack::new()
            .with_layer(layer(
                LayerKind::Platform,
                json!({"labels": {"team": "core"}, "ttl": 10}),
            ))
            .with_layer(layer(LayerKind::User, json!({"labels": "core", "ttl": [10]})));

        match resolve(&stack).unwrap_err() {
            ResolveError::ConflictingLayerType(conflicts) => {
                assert_eq!(conflicts.len(), 2);
                assert_eq!(conflicts[0].path.to_string(), "labels");
                assert_eq!(conflicts[0].existing_layer, "platform");
                assert_eq!(conflicts[0].incoming_layer, "user");
                assert_eq!(conflicts[1].path.to_string(), "ttl");
            }
            other => panic!("expected layer conflicts, got {:?}", other),
        }
    }

    #[test]
    fn contract_scalar_kinds_replace_without_conflict() {
        let stack = LayerStack::new()
            .with_layer(layer(LayerKind::Platform, json!({"region": "us-east-1"})))
            .with_layer(layer(LayerKind::User, json!({"region": "EU-WEST-1"})));

        let resolved = resolve(&stack).unwrap();
        assert_eq!(resolved.get_str("region"), Some("eu-west-1"));
        assert_eq!(resolved.overrides.len(), 1);
        assert_eq!(resolved.overrides[0].from_layer, "platform");
        assert_eq!(resolved.overrides[0].by_layer, "user");
    }
}

/// CONTRACT RESOLVE-003: Validation Reports Everything
mod validation {
    use super::*;

    #[test]
    fn contract_every_violation_is_reported() {
        let stack = LayerStack::new().with_layer(layer(
            LayerKind::User,
            json!({"engine": "mongo", "ttl": 0, "colour": "blue"}),
        ));

        let err = resolve(&stack).unwrap_err();
        assert!(matches!(err, ResolveError::SchemaViolation(_)));
        assert_eq!(err.problem_count(), 3, "{:?}", err.messages());
    }

    #[test]
    fn contract_fallback_alone_is_valid() {
        assert!(resolve(&LayerStack::new()).is_ok());
    }
}

/// CONTRACT RESOLVE-004: Provenance Is Complete
///
/// Every leaf of the resolved value names the layer, normaliser or schema
/// default that produced it.
mod provenance {
    use super::*;

    #[test]
    fn contract_every_leaf_has_a_source() {
        let stack = LayerStack::new()
            .with_layer(layer(LayerKind::Platform, json!({"labels": {"team": "core"}})))
            .with_layer(layer(LayerKind::User, json!({"region": "US-EAST-1"})));

        let resolved = resolve(&stack).unwrap();

        assert_eq!(resolved.source_of("region"), Some(NORMALIZED_SOURCE));
        assert_eq!(resolved.source_of("ttl"), Some(SCHEMA_DEFAULT_SOURCE));
        assert_eq!(resolved.source_of("engine"), Some("hardcoded-fallback"));
        for leaf in resolved.values.leaf_paths() {
            assert!(
                resolved.provenance.contains_key(&leaf),
                "no provenance for {}",
                leaf
            );
        }
    }
}

/// CONTRACT RESOLVE-005: Determinism
mod determinism {
    use super::*;

    #[test]
    fn contract_same_layers_same_fingerprint() {
        let forward = LayerStack::new()
            .with_layer(layer(LayerKind::Platform, json!({"size_mb": 256})))
            .with_layer(layer(LayerKind::User, json!({"ttl": 90})));
        let backward = LayerStack::new()
            .with_layer(layer(LayerKind::User, json!({"ttl": 90})))
            .with_layer(layer(LayerKind::Platform, json!({"size_mb": 256})));

        let a = resolve(&forward).unwrap();
        let b = resolve(&backward).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint, resolve(&forward).unwrap().fingerprint);
    }

    #[test]
    fn contract_free_function_matches_bound_resolver() {
        let component = CacheComponent::new();
        let stack = LayerStack::new().with_layer(layer(LayerKind::User, json!({"ttl": 90})));

        let value = stratus::domain::services::resolve(
            component.schema(),
            &stack,
            &component.hardcoded_fallback(),
        )
        .unwrap();
        let bound = resolve(&stack).unwrap();
        assert_eq!(value.lookup("ttl"), bound.get("ttl"));
        assert_eq!(value.lookup("engine"), bound.get("engine"));
    }
}

/// CONTRACT RESOLVE-006: Idempotence
///
/// Feeding a resolved configuration back as the only layer resolves to the
/// same values: normalisation and default filling are already applied.
mod idempotence {
    use super::*;
    use stratus::application::ComponentCatalog;

    #[test]
    fn contract_re_resolving_resolved_values_is_stable() {
        let catalog = ComponentCatalog::builtin();
        for component_type in catalog.types() {
            let definition = catalog.get(component_type).unwrap();
            let resolver = ConfigResolver::new(definition);
            for framework in ComplianceFramework::ALL {
                for environment in ["dev", "prod"] {
                    let first = resolver
                        .resolve("Orders Store", &LayerStack::new(), framework, environment)
                        .unwrap();
                    let again = LayerStack::new()
                        .with_layer(ConfigLayer::new(LayerKind::User, first.values.clone()));
                    let second = resolver
                        .resolve("Orders Store", &again, framework, environment)
                        .unwrap();

                    assert_eq!(
                        first.values, second.values,
                        "{} under {} in {} is not idempotent",
                        component_type, framework, environment
                    );
                    assert_eq!(first.fingerprint, second.fingerprint);
                }
            }
        }
    }
}
