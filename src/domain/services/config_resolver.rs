//! Configuration resolver
//!
//! merge layers → normalise → fill schema defaults → validate.
//!
//! Every component resolves from its own copy of the layer stack; nothing is
//! shared between sibling components.

use tracing::debug;

use crate::domain::entities::{
    ConfigLayer, LayerKind, LayerStack, ResolvedConfig, Schema, NORMALIZED_SOURCE,
    SCHEMA_DEFAULT_SOURCE,
};
use crate::domain::ports::{ComponentDefinition, NormalizeContext};
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};

use super::layer_merger::{merge_layers, LayerTypeConflict, MergeResult};
use super::schema_validator::{apply_defaults, validate, SchemaViolation};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("{} conflicting layer type(s)", .0.len())]
    ConflictingLayerType(Vec<LayerTypeConflict>),

    #[error("{} schema violation(s)", .0.len())]
    SchemaViolation(Vec<SchemaViolation>),
}

impl ResolveError {
    pub fn problem_count(&self) -> usize {
        match self {
            ResolveError::ConflictingLayerType(conflicts) => conflicts.len(),
            ResolveError::SchemaViolation(violations) => violations.len(),
        }
    }

    /// One line per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ResolveError::ConflictingLayerType(conflicts) => {
                conflicts.iter().map(ToString::to_string).collect()
            }
            ResolveError::SchemaViolation(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
        }
    }
}

/// Resolve without a component definition: `component_defaults` become the
/// hardcoded-fallback layer when the stack has none.
pub fn resolve(
    schema: &Schema,
    layers: &LayerStack,
    component_defaults: &ConfigValue,
) -> Result<ConfigValue, ResolveError> {
    let stack = with_fallback(layers, component_defaults);
    let MergeResult { mut value, .. } =
        merge_layers(&stack).map_err(ResolveError::ConflictingLayerType)?;
    apply_defaults(schema, &mut value);
    check(schema, &value)?;
    Ok(value)
}

/// Resolver bound to one component type.
pub struct ConfigResolver<'a> {
    definition: &'a dyn ComponentDefinition,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(definition: &'a dyn ComponentDefinition) -> Self {
        Self { definition }
    }

    pub fn resolve(
        &self,
        component: &str,
        layers: &LayerStack,
        framework: ComplianceFramework,
        environment: &str,
    ) -> Result<ResolvedConfig, ResolveError> {
        let definition = self.definition;
        let schema = definition.schema();
        let stack = with_fallback(layers, &definition.hardcoded_fallback());

        let MergeResult {
            mut value,
            mut provenance,
            overrides,
        } = merge_layers(&stack).map_err(ResolveError::ConflictingLayerType)?;

        let before = value.clone();
        let ctx = NormalizeContext::new(component, framework, environment);
        definition.normalize(&mut value, &ctx);
        provenance.retain(|path, _| value.get_path(path).is_some());
        for leaf in value.leaf_paths() {
            if before.get_path(&leaf) != value.get_path(&leaf) {
                provenance.insert(leaf, NORMALIZED_SOURCE.to_string());
            }
        }

        for path in apply_defaults(schema, &mut value) {
            provenance.insert(path, SCHEMA_DEFAULT_SOURCE.to_string());
        }

        check(schema, &value)?;

        let resolved = ResolvedConfig::new(
            component,
            definition.component_type(),
            framework,
            environment,
            value,
        )
        .with_provenance(provenance)
        .with_overrides(overrides);

        debug!(
            component,
            component_type = definition.component_type(),
            fingerprint = %resolved.fingerprint.short(),
            layers = ?stack.names(),
            "resolved configuration"
        );
        Ok(resolved)
    }
}

fn with_fallback(layers: &LayerStack, fallback: &ConfigValue) -> LayerStack {
    let mut stack = layers.clone();
    if stack.get(LayerKind::HardcodedFallback).is_none() {
        stack.insert(ConfigLayer::new(LayerKind::HardcodedFallback, fallback.clone()));
    }
    stack
}

fn check(schema: &Schema, value: &ConfigValue) -> Result<(), ResolveError> {
    let violations = validate(schema, value);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::SchemaViolation(violations))
    }
}
