//! Registry contracts (REGISTRY-001 through REGISTRY-003)

use stratus::domain::entities::{CompatibilityEntry, EnhancedBindingContext, WiringPlan};
use stratus::domain::ports::BindingStrategy;
use stratus::domain::services::RegistryError;
use stratus::BinderRegistry;

/// Strategy declaring a fixed set of pairings.
struct Declared {
    name: &'static str,
    entries: Vec<(&'static str, &'static str, &'static str)>,
}

impl Declared {
    fn new(name: &'static str, entries: &[(&'static str, &'static str, &'static str)]) -> Self {
        Self {
            name,
            entries: entries.to_vec(),
        }
    }
}

impl BindingStrategy for Declared {
    fn name(&self) -> &str {
        self.name
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        self.entries
            .iter()
            .map(|(s, t, c)| CompatibilityEntry::new(*s, *t, *c, self.name))
            .collect()
    }

    fn plan_wiring(&self, _context: &EnhancedBindingContext) -> WiringPlan {
        WiringPlan::default()
    }
}

/// CONTRACT REGISTRY-001: First Registered Wins
///
/// When two strategies claim the same pairing, lookups always return the
/// one registered first.
mod first_match {
    use super::*;

    #[test]
    fn contract_earlier_strategy_shadows_later_one() {
        let mut registry = BinderRegistry::new();
        registry
            .register_binding_strategy(Declared::new("primary", &[("worker", "queue", "queue:publish")]))
            .unwrap();
        registry
            .register_binding_strategy(Declared::new(
                "shadow",
                &[("worker", "queue", "queue:publish"), ("worker", "cache", "cache:read")],
            ))
            .unwrap();
        registry.seal();

        for _ in 0..3 {
            let found = registry.find_binding_strategy("worker", "queue:publish").unwrap();
            assert_eq!(found.name(), "primary");
        }
        assert_eq!(
            registry.find_binding_strategy("worker", "cache:read").unwrap().name(),
            "shadow"
        );
        assert!(registry.find_binding_strategy("queue", "queue:publish").is_none());
    }

    #[test]
    fn contract_duplicates_surface_as_validation_warnings() {
        let mut registry = BinderRegistry::new();
        registry
            .register_binding_strategy(Declared::new("primary", &[("worker", "queue", "queue:publish")]))
            .unwrap();
        registry
            .register_binding_strategy(Declared::new("shadow", &[("worker", "queue", "queue:publish")]))
            .unwrap();

        let report = registry.validate_matrix();
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("'primary' and 'shadow'"));
    }

    #[test]
    fn contract_incomplete_entries_invalidate_the_matrix() {
        let mut registry = BinderRegistry::new();
        registry
            .register_binding_strategy(Declared::new("broken", &[("worker", "", "queue:publish")]))
            .unwrap();

        let report = registry.validate_matrix();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("target_type"));
    }
}

/// CONTRACT REGISTRY-002: Sealing
///
/// A sealed registry rejects registration and keeps answering lookups.
mod sealing {
    use super::*;

    #[test]
    fn contract_sealed_registry_rejects_registration() {
        let mut registry = BinderRegistry::with_builtin_strategies();
        let before = registry.all_bindings();
        registry.seal();

        let err = registry
            .register_binding_strategy(Declared::new("late", &[("worker", "cache", "cache:read")]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Sealed {
                kind: "binding",
                name: "late".to_string()
            }
        );
        assert_eq!(registry.all_bindings(), before);
        assert!(!registry.is_binding_supported("worker", "cache", "cache:read"));
    }

    #[test]
    fn contract_lookups_work_before_seal() {
        let registry = BinderRegistry::with_builtin_strategies();
        assert!(!registry.is_sealed());
        assert!(registry.is_binding_supported("worker", "queue", "queue:publish"));
        assert!(registry.is_trigger_supported("queue", "worker", "message"));
    }
}

/// CONTRACT REGISTRY-003: Alternatives
///
/// Recommendations never include the rejected pairing itself and list
/// same-pair capabilities before same-capability targets.
mod alternatives {
    use super::*;

    #[test]
    fn contract_same_pair_first_then_same_capability() {
        let mut registry = BinderRegistry::new();
        registry
            .register_binding_strategy(Declared::new(
                "mixed",
                &[
                    ("worker", "database", "db:read"),
                    ("worker", "queue", "queue:publish"),
                    ("worker", "queue", "queue:consume"),
                    ("worker", "cache", "db:read"),
                ],
            ))
            .unwrap();

        let alternatives: Vec<String> = registry
            .recommend_alternatives("worker", "queue", "db:read")
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            alternatives,
            vec![
                "worker -> queue (queue:publish)",
                "worker -> queue (queue:consume)",
                "worker -> database (db:read)",
                "worker -> cache (db:read)",
            ]
        );
    }

    #[test]
    fn contract_unknown_source_has_no_alternatives() {
        let registry = BinderRegistry::with_builtin_strategies().sealed();
        assert!(registry
            .recommend_alternatives("mainframe", "queue", "queue:publish")
            .is_empty());
        assert!(registry.supported_bindings("mainframe").is_empty());
    }
}
