//! Layer entity
//!
//! A configuration layer is one named, partial configuration source. A
//! `LayerStack` holds at most one layer per kind and always iterates from the
//! lowest to the highest precedence.

use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::ConfigValue;

/// The five canonical layers, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// Component-type built-in safety defaults
    HardcodedFallback,
    /// Organisation-wide baseline
    Platform,
    /// Defaults keyed by the declared compliance framework
    Compliance,
    /// Overrides keyed by deployment environment
    Environment,
    /// Overrides from the manifest instance
    User,
}

impl LayerKind {
    /// Ascending precedence order.
    pub const ORDERED: [LayerKind; 5] = [
        LayerKind::HardcodedFallback,
        LayerKind::Platform,
        LayerKind::Compliance,
        LayerKind::Environment,
        LayerKind::User,
    ];

    /// 1 (lowest) to 5 (highest).
    pub fn precedence(&self) -> u8 {
        match self {
            LayerKind::HardcodedFallback => 1,
            LayerKind::Platform => 2,
            LayerKind::Compliance => 3,
            LayerKind::Environment => 4,
            LayerKind::User => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::HardcodedFallback => "hardcoded-fallback",
            LayerKind::Platform => "platform",
            LayerKind::Compliance => "compliance",
            LayerKind::Environment => "environment",
            LayerKind::User => "user",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer {
    pub kind: LayerKind,
    /// Display name, e.g. `compliance:fedramp-high` or `environment:prod`.
    pub name: String,
    pub values: ConfigValue,
}

impl ConfigLayer {
    pub fn new(kind: LayerKind, values: impl Into<ConfigValue>) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            values: values.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// True when the layer contributes nothing.
    pub fn is_empty(&self) -> bool {
        match &self.values {
            ConfigValue::Null => true,
            ConfigValue::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// Ordered map of layer kind to partial configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<ConfigLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`LayerStack::insert`].
    pub fn with_layer(mut self, layer: ConfigLayer) -> Self {
        self.insert(layer);
        self
    }

    /// Insert a layer, replacing any existing layer of the same kind.
    /// Precedence order is maintained regardless of insertion order.
    pub fn insert(&mut self, layer: ConfigLayer) {
        match self.layers.binary_search_by_key(&layer.kind, |l| l.kind) {
            Ok(idx) => self.layers[idx] = layer,
            Err(idx) => self.layers.insert(idx, layer),
        }
    }

    pub fn get(&self, kind: LayerKind) -> Option<&ConfigLayer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn remove(&mut self, kind: LayerKind) -> Option<ConfigLayer> {
        let idx = self.layers.iter().position(|l| l.kind == kind)?;
        Some(self.layers.remove(idx))
    }

    /// Layers from lowest to highest precedence.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }
}
