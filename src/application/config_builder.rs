//! Layer assembly
//!
//! Builds the layer stack for one component instance out of the engine
//! configuration and the manifest entry, then resolves it. The hardcoded
//! fallback layer is supplied by the component definition.

use crate::config::EngineConfig;
use crate::domain::entities::{ConfigLayer, LayerKind, LayerStack, ResolvedConfig};
use crate::domain::services::ConfigResolver;
use crate::domain::value_objects::{ComplianceFramework, ConfigValue};
use crate::error::{StratusError, StratusResult};
use crate::manifest::ComponentSpec;

use super::catalog::ComponentCatalog;

pub struct ConfigBuilder<'a> {
    config: &'a EngineConfig,
    catalog: &'a ComponentCatalog,
}

impl<'a> ConfigBuilder<'a> {
    pub fn new(config: &'a EngineConfig, catalog: &'a ComponentCatalog) -> Self {
        Self { config, catalog }
    }

    /// Platform, compliance, environment and user layers. Empty sources are left out.
    pub fn layers_for(
        &self,
        component_type: &str,
        user: &ConfigValue,
        framework: ComplianceFramework,
        environment: &str,
    ) -> LayerStack {
        let mut stack = LayerStack::new();

        if let Some(values) = self.config.platform_defaults(component_type) {
            stack.insert(ConfigLayer::new(LayerKind::Platform, values.clone()));
        }
        if let Some(values) = self.config.posture_defaults(framework, component_type) {
            stack.insert(
                ConfigLayer::new(LayerKind::Compliance, values.clone())
                    .with_name(format!("compliance:{}", framework)),
            );
        }
        if let Some(values) = self.config.environment_overrides(environment, component_type) {
            stack.insert(
                ConfigLayer::new(LayerKind::Environment, values.clone())
                    .with_name(format!("environment:{}", environment)),
            );
        }
        if !user.is_null() {
            stack.insert(ConfigLayer::new(LayerKind::User, user.clone()));
        }
        stack
    }

    pub fn resolve(
        &self,
        component: &ComponentSpec,
        framework: ComplianceFramework,
        environment: &str,
    ) -> StratusResult<ResolvedConfig> {
        let definition = self.catalog.get(&component.component_type).ok_or_else(|| {
            StratusError::UnknownComponentType {
                component: component.name.clone(),
                component_type: component.component_type.clone(),
            }
        })?;

        let layers = self.layers_for(
            &component.component_type,
            &component.config,
            framework,
            environment,
        );
        ConfigResolver::new(definition)
            .resolve(&component.name, &layers, framework, environment)
            .map_err(|source| StratusError::Resolve {
                component: component.name.clone(),
                source,
            })
    }
}
