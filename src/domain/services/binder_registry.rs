//! Binder registry
//!
//! Ordered catalog of binding and trigger strategies. Lookups return the
//! first registered strategy that claims a pairing, so registration order is
//! part of the contract. Once sealed, the registry rejects registration.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::entities::{CompatibilityEntry, TriggerEntry};
use crate::domain::ports::{BindingStrategy, TriggerStrategy};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("registry is sealed; cannot register {kind} strategy '{name}'")]
    Sealed { kind: &'static str, name: String },
}

/// Result of [`BinderRegistry::validate_matrix`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Default)]
pub struct BinderRegistry {
    binding_strategies: Vec<Arc<dyn BindingStrategy>>,
    trigger_strategies: Vec<Arc<dyn TriggerStrategy>>,
    /// Declarations per strategy, captured at registration.
    binding_entries: Vec<Vec<CompatibilityEntry>>,
    trigger_entries: Vec<Vec<TriggerEntry>>,
    /// source type -> (strategy index, entry index), registration order.
    binding_index: HashMap<String, Vec<(usize, usize)>>,
    trigger_index: HashMap<String, Vec<(usize, usize)>>,
    sealed: bool,
}

impl BinderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsealed registry holding `bindings` and `triggers` in the given order.
    pub fn from_strategies(
        bindings: Vec<Arc<dyn BindingStrategy>>,
        triggers: Vec<Arc<dyn TriggerStrategy>>,
    ) -> Self {
        let mut registry = Self::new();
        for strategy in bindings {
            registry.push_binding(strategy);
        }
        for strategy in triggers {
            registry.push_trigger(strategy);
        }
        registry
    }

    /// End registration. Further `register_*` calls fail.
    pub fn seal(&mut self) {
        if !self.sealed {
            info!(
                bindings = self.binding_strategies.len(),
                triggers = self.trigger_strategies.len(),
                "binder registry sealed"
            );
        }
        self.sealed = true;
    }

    /// Builder form of [`BinderRegistry::seal`].
    pub fn sealed(mut self) -> Self {
        self.seal();
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Append a binding strategy. No de-duplication happens here.
    pub fn register_binding_strategy<S>(&mut self, strategy: S) -> Result<(), RegistryError>
    where
        S: BindingStrategy + 'static,
    {
        self.register_binding_arc(Arc::new(strategy))
    }

    pub fn register_binding_arc(
        &mut self,
        strategy: Arc<dyn BindingStrategy>,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed {
                kind: "binding",
                name: strategy.name().to_string(),
            });
        }
        self.push_binding(strategy);
        Ok(())
    }

    fn push_binding(&mut self, strategy: Arc<dyn BindingStrategy>) {
        let idx = self.binding_strategies.len();
        let entries = strategy.compatibility_matrix();
        for (entry_idx, entry) in entries.iter().enumerate() {
            self.binding_index
                .entry(entry.source_type.clone())
                .or_default()
                .push((idx, entry_idx));
        }
        debug!(
            strategy = strategy.name(),
            entries = entries.len(),
            "registered binding strategy"
        );
        self.binding_entries.push(entries);
        self.binding_strategies.push(strategy);
    }

    pub fn register_trigger_strategy<S>(&mut self, strategy: S) -> Result<(), RegistryError>
    where
        S: TriggerStrategy + 'static,
    {
        self.register_trigger_arc(Arc::new(strategy))
    }

    pub fn register_trigger_arc(
        &mut self,
        strategy: Arc<dyn TriggerStrategy>,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed {
                kind: "trigger",
                name: strategy.name().to_string(),
            });
        }
        self.push_trigger(strategy);
        Ok(())
    }

    fn push_trigger(&mut self, strategy: Arc<dyn TriggerStrategy>) {
        let idx = self.trigger_strategies.len();
        let entries = strategy.trigger_matrix();
        for (entry_idx, entry) in entries.iter().enumerate() {
            self.trigger_index
                .entry(entry.source_type.clone())
                .or_default()
                .push((idx, entry_idx));
        }
        debug!(
            strategy = strategy.name(),
            entries = entries.len(),
            "registered trigger strategy"
        );
        self.trigger_entries.push(entries);
        self.trigger_strategies.push(strategy);
    }

    /// First registered strategy that handles `capability` from `source_type`.
    pub fn find_binding_strategy(
        &self,
        source_type: &str,
        capability: &str,
    ) -> Option<&dyn BindingStrategy> {
        self.binding_strategies
            .iter()
            .find(|s| s.can_handle(source_type, capability))
            .map(|s| s.as_ref())
    }

    pub fn find_trigger_strategy(
        &self,
        source_type: &str,
        target_type: &str,
        event_type: &str,
    ) -> Option<&dyn TriggerStrategy> {
        self.trigger_strategies
            .iter()
            .find(|s| s.can_handle(source_type, target_type, event_type))
            .map(|s| s.as_ref())
    }

    pub fn is_binding_supported(&self, source_type: &str, target_type: &str, capability: &str) -> bool {
        self.binding_entries_for(source_type)
            .any(|e| e.target_type == target_type && e.capability == capability)
    }

    pub fn is_trigger_supported(&self, source_type: &str, target_type: &str, event_type: &str) -> bool {
        self.trigger_entries_for(source_type)
            .any(|e| e.target_type == target_type && e.event_type == event_type)
    }

    /// Every binding entry for `source_type`, in strategy registration order.
    pub fn supported_bindings(&self, source_type: &str) -> Vec<CompatibilityEntry> {
        self.binding_entries_for(source_type).cloned().collect()
    }

    pub fn supported_triggers(&self, source_type: &str) -> Vec<TriggerEntry> {
        self.trigger_entries_for(source_type).cloned().collect()
    }

    /// Every binding entry across all sources, in registration order.
    pub fn all_bindings(&self) -> Vec<CompatibilityEntry> {
        self.binding_entries.iter().flatten().cloned().collect()
    }

    pub fn all_triggers(&self) -> Vec<TriggerEntry> {
        self.trigger_entries.iter().flatten().cloned().collect()
    }

    /// Known pairings near an unsupported request: other capabilities between
    /// the same two types first, then other targets offering `capability` to
    /// the same source.
    pub fn recommend_alternatives(
        &self,
        source_type: &str,
        target_type: &str,
        capability: &str,
    ) -> Vec<CompatibilityEntry> {
        let mut out: Vec<CompatibilityEntry> = Vec::new();
        let same_pair = self
            .binding_entries_for(source_type)
            .filter(|e| e.target_type == target_type && e.capability != capability);
        let same_capability = self
            .binding_entries_for(source_type)
            .filter(|e| e.target_type != target_type && e.capability == capability);

        for entry in same_pair.chain(same_capability) {
            let seen = out.iter().any(|o| {
                o.target_type == entry.target_type && o.capability == entry.capability
            });
            if !seen {
                out.push(entry.clone());
            }
        }
        out
    }

    /// Consistency check: incomplete entries are errors, duplicate pairings are warnings.
    pub fn validate_matrix(&self) -> MatrixValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let mut seen: BTreeMap<(String, String, String), &str> = BTreeMap::new();
        for (strategy, entries) in self.binding_strategies.iter().zip(&self.binding_entries) {
            for entry in entries {
                let missing = entry.missing_fields();
                if !missing.is_empty() {
                    errors.push(format!(
                        "binding strategy '{}': entry '{}' is missing {}",
                        strategy.name(),
                        entry,
                        missing.join(", ")
                    ));
                    continue;
                }
                let key = (
                    entry.source_type.clone(),
                    entry.target_type.clone(),
                    entry.capability.clone(),
                );
                match seen.get(&key) {
                    Some(first) => warnings.push(format!(
                        "duplicate binding '{}' declared by '{}' and '{}'",
                        entry,
                        first,
                        strategy.name()
                    )),
                    None => {
                        seen.insert(key, strategy.name());
                    }
                }
            }
        }

        let mut seen: BTreeMap<(String, String, String), &str> = BTreeMap::new();
        for (strategy, entries) in self.trigger_strategies.iter().zip(&self.trigger_entries) {
            for entry in entries {
                let missing = entry.missing_fields();
                if !missing.is_empty() {
                    errors.push(format!(
                        "trigger strategy '{}': entry '{}' is missing {}",
                        strategy.name(),
                        entry,
                        missing.join(", ")
                    ));
                    continue;
                }
                let key = (
                    entry.source_type.clone(),
                    entry.target_type.clone(),
                    entry.event_type.clone(),
                );
                match seen.get(&key) {
                    Some(first) => warnings.push(format!(
                        "duplicate trigger '{}' declared by '{}' and '{}'",
                        entry,
                        first,
                        strategy.name()
                    )),
                    None => {
                        seen.insert(key, strategy.name());
                    }
                }
            }
        }

        MatrixValidation {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn binding_strategy_names(&self) -> Vec<&str> {
        self.binding_strategies.iter().map(|s| s.name()).collect()
    }

    pub fn trigger_strategy_names(&self) -> Vec<&str> {
        self.trigger_strategies.iter().map(|s| s.name()).collect()
    }

    fn binding_entries_for<'a>(
        &'a self,
        source_type: &str,
    ) -> impl Iterator<Item = &'a CompatibilityEntry> + 'a {
        self.binding_index
            .get(source_type)
            .into_iter()
            .flatten()
            .map(move |&(s, e)| &self.binding_entries[s][e])
    }

    fn trigger_entries_for<'a>(
        &'a self,
        source_type: &str,
    ) -> impl Iterator<Item = &'a TriggerEntry> + 'a {
        self.trigger_index
            .get(source_type)
            .into_iter()
            .flatten()
            .map(move |&(s, e)| &self.trigger_entries[s][e])
    }
}

impl fmt::Debug for BinderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderRegistry")
            .field("binding_strategies", &self.binding_strategy_names())
            .field("trigger_strategies", &self.trigger_strategy_names())
            .field("sealed", &self.sealed)
            .finish()
    }
}
