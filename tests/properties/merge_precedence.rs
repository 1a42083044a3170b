//! Property tests for layer merging.

use std::collections::BTreeMap;

use proptest::prelude::*;

use stratus::domain::services::{deep_merge, merge_layers};
use stratus::domain::value_objects::ConfigPath;
use stratus::{ConfigLayer, ConfigValue, LayerKind, LayerStack};

const KEYS: &[&str] = &["memory", "timeout", "region", "retries"];

fn scalar() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Integer),
        "[a-z0-9-]{0,8}".prop_map(ConfigValue::String),
    ]
}

/// Arbitrary nested values without floats, so equality is total.
fn value() -> impl Strategy<Value = ConfigValue> {
    let leaf = prop_oneof![Just(ConfigValue::Null), scalar()];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::Array),
            proptest::collection::btree_map("[a-c]", inner, 0..4).prop_map(ConfigValue::Object),
        ]
    })
}

/// Flat layer over a fixed key set: every key is absent or a scalar.
fn flat_layer() -> impl Strategy<Value = BTreeMap<String, ConfigValue>> {
    proptest::collection::vec(proptest::option::of(scalar()), KEYS.len()).prop_map(|slots| {
        KEYS.iter()
            .zip(slots)
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: For flat scalar layers, every key takes the value and the
    /// provenance of the highest layer that sets it.
    #[test]
    fn property_highest_layer_wins(
        layers in proptest::collection::vec(proptest::option::of(flat_layer()), LayerKind::ORDERED.len()),
        reversed in any::<bool>(),
    ) {
        let mut present: Vec<(LayerKind, BTreeMap<String, ConfigValue>)> = LayerKind::ORDERED
            .iter()
            .zip(layers)
            .filter_map(|(kind, layer)| layer.map(|l| (*kind, l)))
            .collect();
        if reversed {
            present.reverse();
        }

        let mut stack = LayerStack::new();
        for (kind, values) in &present {
            stack.insert(ConfigLayer::new(*kind, ConfigValue::Object(values.clone())));
        }
        let merged = merge_layers(&stack).unwrap();

        for key in KEYS {
            let winner = present
                .iter()
                .filter(|(_, values)| values.contains_key(*key))
                .max_by_key(|(kind, _)| kind.precedence());
            match winner {
                Some((kind, values)) => {
                    prop_assert_eq!(merged.value.get(key), values.get(*key));
                    prop_assert_eq!(
                        merged.provenance.get(&ConfigPath::parse(key)).map(String::as_str),
                        Some(kind.as_str())
                    );
                }
                None => prop_assert!(merged.value.get(key).is_none()),
            }
        }
    }

    /// PROPERTY: Merging never panics; it either merges or names a conflict path.
    #[test]
    fn property_merge_never_panics(base in value(), overlay in value()) {
        match deep_merge(&base, &overlay) {
            Ok(_) => {}
            Err(conflicts) => prop_assert!(!conflicts.is_empty()),
        }
    }

    /// PROPERTY: Merging a value over itself is the identity.
    #[test]
    fn property_self_merge_is_identity(v in value()) {
        prop_assert_eq!(deep_merge(&v, &v).unwrap(), v);
    }

    /// PROPERTY: A null overlay changes nothing.
    #[test]
    fn property_null_overlay_is_identity(v in value()) {
        prop_assert_eq!(deep_merge(&v, &ConfigValue::Null).unwrap(), v);
    }
}
