//! Property tests for binder registry lookups.

use proptest::prelude::*;

use stratus::domain::entities::{CompatibilityEntry, EnhancedBindingContext, WiringPlan};
use stratus::domain::ports::BindingStrategy;
use stratus::BinderRegistry;

const TYPES: &[&str] = &["worker", "queue", "database"];
const CAPABILITIES: &[&str] = &["queue:publish", "queue:consume", "db:read", "db:write"];

struct Generated {
    name: String,
    entries: Vec<CompatibilityEntry>,
}

impl BindingStrategy for Generated {
    fn name(&self) -> &str {
        &self.name
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        self.entries.clone()
    }

    fn plan_wiring(&self, _context: &EnhancedBindingContext) -> WiringPlan {
        WiringPlan::default()
    }
}

fn entry() -> impl Strategy<Value = CompatibilityEntry> {
    (
        proptest::sample::select(TYPES),
        proptest::sample::select(TYPES),
        proptest::sample::select(CAPABILITIES),
    )
        .prop_map(|(s, t, c)| CompatibilityEntry::new(s, t, c, "generated"))
}

fn strategies() -> impl Strategy<Value = Vec<Vec<CompatibilityEntry>>> {
    proptest::collection::vec(proptest::collection::vec(entry(), 0..4), 0..6)
}

fn build(declared: &[Vec<CompatibilityEntry>]) -> BinderRegistry {
    let mut registry = BinderRegistry::new();
    for (idx, entries) in declared.iter().enumerate() {
        registry
            .register_binding_strategy(Generated {
                name: format!("s{}", idx),
                entries: entries.clone(),
            })
            .unwrap();
    }
    registry.sealed()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Lookup returns the first registered strategy declaring the
    /// pairing, and the answer is stable across repeated calls.
    #[test]
    fn property_first_declaring_strategy_wins(declared in strategies()) {
        let registry = build(&declared);

        for source in TYPES {
            for capability in CAPABILITIES {
                let expected = declared
                    .iter()
                    .position(|entries| {
                        entries
                            .iter()
                            .any(|e| e.source_type == *source && e.capability == *capability)
                    })
                    .map(|idx| format!("s{}", idx));

                for _ in 0..2 {
                    let found = registry
                        .find_binding_strategy(source, capability)
                        .map(|s| s.name().to_string());
                    prop_assert_eq!(&found, &expected);
                }
            }
        }
    }

    /// PROPERTY: Per-source listings preserve registration order.
    #[test]
    fn property_supported_bindings_follow_registration_order(declared in strategies()) {
        let registry = build(&declared);

        for source in TYPES {
            let expected: Vec<CompatibilityEntry> = declared
                .iter()
                .flatten()
                .filter(|e| e.source_type == *source)
                .cloned()
                .collect();
            prop_assert_eq!(registry.supported_bindings(source), expected);
        }
        prop_assert_eq!(
            registry.all_bindings(),
            declared.iter().flatten().cloned().collect::<Vec<_>>()
        );
    }

    /// PROPERTY: Alternatives never repeat and never echo the request.
    #[test]
    fn property_alternatives_exclude_request(
        declared in strategies(),
        target in proptest::sample::select(TYPES),
        capability in proptest::sample::select(CAPABILITIES),
    ) {
        let registry = build(&declared);
        let alternatives = registry.recommend_alternatives("worker", target, capability);

        for (idx, alt) in alternatives.iter().enumerate() {
            prop_assert!(!(alt.target_type == target && alt.capability == capability));
            prop_assert!(!alternatives[..idx]
                .iter()
                .any(|o| o.target_type == alt.target_type && o.capability == alt.capability));
        }
    }
}
