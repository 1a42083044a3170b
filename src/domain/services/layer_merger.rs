//! Layer merger
//!
//! Deep-merges configuration layers from lowest to highest precedence:
//! - Object × object: recursive merge
//! - Array or scalar over the same shape: higher layer replaces entirely
//! - Null on either side: the other side is kept
//! - Object vs array vs scalar at the same path: a type conflict, never guessed at

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::domain::entities::{LayerStack, OverrideInfo};
use crate::domain::value_objects::{ConfigPath, ConfigValue, ValueKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    pub value: ConfigValue,
    /// Layer that supplied each leaf.
    pub provenance: BTreeMap<ConfigPath, String>,
    pub overrides: Vec<OverrideInfo>,
}

/// Two layers disagree on the structural shape of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTypeConflict {
    pub path: ConfigPath,
    pub existing_layer: String,
    pub existing: ValueKind,
    pub incoming_layer: String,
    pub incoming: ValueKind,
}

impl fmt::Display for LayerTypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: layer '{}' sets {} but layer '{}' sets {}",
            self.path, self.existing_layer, self.existing, self.incoming_layer, self.incoming
        )
    }
}

#[derive(Default)]
struct MergeState {
    provenance: BTreeMap<ConfigPath, String>,
    overrides: Vec<OverrideInfo>,
    conflicts: Vec<LayerTypeConflict>,
}

impl MergeState {
    /// Layer owning `path`, or the first leaf below it.
    fn owner(&self, path: &ConfigPath) -> String {
        self.provenance
            .get(path)
            .or_else(|| {
                self.provenance
                    .iter()
                    .find(|(p, _)| p.starts_with(path))
                    .map(|(_, layer)| layer)
            })
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn record_leaves(&mut self, value: &ConfigValue, path: &ConfigPath, layer: &str) {
        for leaf in value.leaf_paths() {
            let full = leaf
                .segments()
                .iter()
                .fold(path.clone(), |acc, segment| acc.child(segment));
            self.provenance.insert(full, layer.to_string());
        }
    }
}

/// Merge every layer of `stack` in precedence order.
///
/// All type conflicts are collected before failing.
pub fn merge_layers(stack: &LayerStack) -> Result<MergeResult, Vec<LayerTypeConflict>> {
    let mut value = ConfigValue::object();
    let mut state = MergeState::default();

    for layer in stack.iter() {
        merge_value(
            &mut value,
            &layer.values,
            &ConfigPath::root(),
            &layer.name,
            &mut state,
        );
    }

    if !state.conflicts.is_empty() {
        return Err(state.conflicts);
    }

    Ok(MergeResult {
        value,
        provenance: state.provenance,
        overrides: state.overrides,
    })
}

/// Merge `overlay` over `base` with the layer rules above.
pub fn deep_merge(
    base: &ConfigValue,
    overlay: &ConfigValue,
) -> Result<ConfigValue, Vec<LayerTypeConflict>> {
    let mut value = ConfigValue::Null;
    let mut state = MergeState::default();
    merge_value(&mut value, base, &ConfigPath::root(), "base", &mut state);
    merge_value(&mut value, overlay, &ConfigPath::root(), "overlay", &mut state);
    if state.conflicts.is_empty() {
        Ok(value)
    } else {
        Err(state.conflicts)
    }
}

fn merge_value(
    target: &mut ConfigValue,
    overlay: &ConfigValue,
    path: &ConfigPath,
    layer: &str,
    state: &mut MergeState,
) {
    if overlay.is_null() {
        return;
    }

    if target.is_null() {
        *target = overlay.clone();
        state.record_leaves(overlay, path, layer);
        return;
    }

    match (target, overlay) {
        (ConfigValue::Object(base), ConfigValue::Object(incoming)) => {
            for (key, child) in incoming {
                if child.is_null() {
                    continue;
                }
                let slot = base.entry(key.clone()).or_insert(ConfigValue::Null);
                merge_value(slot, child, &path.child(key), layer, state);
            }
        }
        (target, overlay) if target.shape() == overlay.shape() => {
            let from_layer = state.owner(path);
            debug!(path = %path, from = %from_layer, by = %layer, "layer override");
            state.overrides.push(OverrideInfo {
                path: path.clone(),
                from_layer,
                by_layer: layer.to_string(),
            });
            *target = overlay.clone();
            state.provenance.insert(path.clone(), layer.to_string());
        }
        (target, overlay) => {
            let existing_layer = state.owner(path);
            state.conflicts.push(LayerTypeConflict {
                path: path.clone(),
                existing_layer,
                existing: target.kind(),
                incoming_layer: layer.to_string(),
                incoming: overlay.kind(),
            });
        }
    }
}
