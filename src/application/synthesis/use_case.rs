//! Synthesis Use Case
//!
//! Orchestrates one manifest through the engine:
//! 1. Resolve every component from its own layer stack
//! 2. Look up a strategy for every binding and trigger
//! 3. Enforce compliance on each supported connection
//! 4. Plan wiring for approved connections
//!
//! Nothing is provisioned; the plan is handed back to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::entities::{
    BindingEndpoint, BindingOptions, CapabilityData, CompatibilityEntry, EnforcementResult,
    EnhancedBindingContext, ResolvedConfig, Severity, TriggerEntry,
};
use crate::domain::policies::ComplianceEnforcer;
use crate::domain::services::BinderRegistry;
use crate::domain::value_objects::ComplianceFramework;
use crate::error::{StratusError, StratusResult};
use crate::manifest::{BindingSpec, Manifest, TriggerSpec};

use super::super::catalog::ComponentCatalog;
use super::super::config_builder::ConfigBuilder;
use super::result::{ComponentOutcome, ConnectionOutcome, SynthesisPlan, Verdict};

pub struct SynthesisPipeline {
    registry: Arc<BinderRegistry>,
    enforcer: ComplianceEnforcer,
    catalog: ComponentCatalog,
    config: EngineConfig,
}

impl SynthesisPipeline {
    /// The registry must already be sealed.
    pub fn new(registry: Arc<BinderRegistry>, config: EngineConfig) -> StratusResult<Self> {
        if !registry.is_sealed() {
            return Err(StratusError::RegistryNotSealed);
        }
        let enforcer = ComplianceEnforcer::standard(&config.enforcement.required_tags);
        Ok(Self {
            registry,
            enforcer,
            catalog: ComponentCatalog::builtin(),
            config,
        })
    }

    pub fn with_enforcer(mut self, enforcer: ComplianceEnforcer) -> Self {
        self.enforcer = enforcer;
        self
    }

    pub fn with_catalog(mut self, catalog: ComponentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn registry(&self) -> &BinderRegistry {
        &self.registry
    }

    pub fn plan(&self, manifest: &Manifest) -> SynthesisPlan {
        let framework = manifest
            .compliance_framework
            .unwrap_or(self.config.defaults.framework);
        let environment = manifest
            .environment
            .clone()
            .unwrap_or_else(|| self.config.defaults.environment.clone());

        let builder = ConfigBuilder::new(&self.config, &self.catalog);
        let components: Vec<ComponentOutcome> = manifest
            .components
            .iter()
            .map(|spec| match builder.resolve(spec, framework, &environment) {
                Ok(resolved) => ComponentOutcome {
                    name: spec.name.clone(),
                    component_type: spec.component_type.clone(),
                    resolved: Some(resolved),
                    errors: Vec::new(),
                },
                Err(err) => ComponentOutcome {
                    name: spec.name.clone(),
                    component_type: spec.component_type.clone(),
                    resolved: None,
                    errors: component_errors(err),
                },
            })
            .collect();

        let resolved: BTreeMap<&str, &ResolvedConfig> = components
            .iter()
            .filter_map(|c| c.resolved.as_ref().map(|r| (c.name.as_str(), r)))
            .collect();
        let inherited_tags = manifest.binding_tags();

        let bindings = manifest
            .bindings
            .iter()
            .map(|b| self.plan_binding(b, &resolved, framework, &inherited_tags))
            .collect();
        let triggers = manifest
            .triggers
            .iter()
            .map(|t| self.plan_trigger(t, &resolved, framework, &inherited_tags))
            .collect();

        let plan = SynthesisPlan {
            service: manifest.service.clone(),
            framework,
            environment,
            warnings_as_errors: self.config.enforcement.warnings_as_errors,
            manifest_errors: manifest.validate_references(),
            components,
            bindings,
            triggers,
        };

        info!(
            service = %plan.service,
            framework = %plan.framework,
            components = plan.components.len(),
            bindings = plan.bindings.len(),
            triggers = plan.triggers.len(),
            provisionable = plan.is_provisionable(),
            "synthesis plan ready"
        );
        plan
    }

    fn plan_binding(
        &self,
        spec: &BindingSpec,
        resolved: &BTreeMap<&str, &ResolvedConfig>,
        framework: ComplianceFramework,
        inherited_tags: &BTreeMap<String, String>,
    ) -> ConnectionOutcome {
        let label = format!("{} -> {} ({})", spec.from, spec.to, spec.capability);
        let (source, target) = match endpoints(resolved, &spec.from, &spec.to) {
            Ok(pair) => pair,
            Err(reason) => {
                return ConnectionOutcome::new(label, &spec.from, &spec.to, Verdict::Skipped { reason })
            }
        };

        let strategy = self
            .registry
            .is_binding_supported(&source.component_type, &target.component_type, &spec.capability)
            .then(|| {
                self.registry
                    .find_binding_strategy(&source.component_type, &spec.capability)
            })
            .flatten();
        let Some(strategy) = strategy else {
            let alternatives = self
                .registry
                .recommend_alternatives(&source.component_type, &target.component_type, &spec.capability)
                .iter()
                .map(CompatibilityEntry::to_string)
                .collect();
            debug!(binding = %label, "no binding strategy");
            return ConnectionOutcome::new(
                label,
                &spec.from,
                &spec.to,
                Verdict::Unsupported { alternatives },
            );
        };

        let context = self.context(source, target, &spec.capability, framework, spec.options(inherited_tags));
        let enforcement = self.enforcer.enforce(&context);
        let approved = self.is_approved(&enforcement);

        let mut outcome = ConnectionOutcome::new(
            label,
            &spec.from,
            &spec.to,
            if approved { Verdict::Approved } else { Verdict::Blocked },
        );
        outcome.strategy = Some(strategy.name().to_string());
        outcome.wiring = approved.then(|| strategy.plan_wiring(&context));
        outcome.enforcement = Some(enforcement);
        outcome
    }

    fn plan_trigger(
        &self,
        spec: &TriggerSpec,
        resolved: &BTreeMap<&str, &ResolvedConfig>,
        framework: ComplianceFramework,
        inherited_tags: &BTreeMap<String, String>,
    ) -> ConnectionOutcome {
        let label = format!("{} -> {} [{}]", spec.from, spec.to, spec.event);
        let (source, target) = match endpoints(resolved, &spec.from, &spec.to) {
            Ok(pair) => pair,
            Err(reason) => {
                return ConnectionOutcome::new(label, &spec.from, &spec.to, Verdict::Skipped { reason })
            }
        };

        let Some(strategy) = self.registry.find_trigger_strategy(
            &source.component_type,
            &target.component_type,
            &spec.event,
        ) else {
            let alternatives = self
                .registry
                .supported_triggers(&source.component_type)
                .iter()
                .map(TriggerEntry::to_string)
                .collect();
            debug!(trigger = %label, "no trigger strategy");
            return ConnectionOutcome::new(
                label,
                &spec.from,
                &spec.to,
                Verdict::Unsupported { alternatives },
            );
        };

        let options = BindingOptions {
            tags: inherited_tags.clone(),
            ..BindingOptions::default()
        };
        let context = self.context(source, target, &spec.event, framework, options);
        let enforcement = self.enforcer.enforce(&context);
        let approved = self.is_approved(&enforcement);

        let mut outcome = ConnectionOutcome::new(
            label,
            &spec.from,
            &spec.to,
            if approved { Verdict::Approved } else { Verdict::Blocked },
        );
        outcome.strategy = Some(strategy.name().to_string());
        outcome.wiring = approved.then(|| {
            let mut wiring = strategy.plan_wiring(&context);
            if let Some(batch_size) = spec.batch_size {
                for mapping in &mut wiring.event_sources {
                    mapping.batch_size = batch_size;
                }
            }
            wiring
        });
        outcome.enforcement = Some(enforcement);
        outcome
    }

    fn context(
        &self,
        source: &ResolvedConfig,
        target: &ResolvedConfig,
        capability: &str,
        framework: ComplianceFramework,
        options: BindingOptions,
    ) -> EnhancedBindingContext {
        let target_capability_data = self
            .catalog
            .get(&target.component_type)
            .map(|d| d.capability_data(&target.component, capability, &target.values))
            .unwrap_or_default();
        EnhancedBindingContext {
            source: endpoint(source),
            target: endpoint(target),
            target_capability_data: CapabilityData {
                capability: capability.to_string(),
                ..target_capability_data
            },
            compliance_framework: framework,
            options,
        }
    }

    fn is_approved(&self, enforcement: &EnforcementResult) -> bool {
        enforcement.compliant
            && !(self.config.enforcement.warnings_as_errors && enforcement.count(Severity::Warning) > 0)
    }
}

fn endpoint(resolved: &ResolvedConfig) -> BindingEndpoint {
    BindingEndpoint::new(
        resolved.component.clone(),
        resolved.component_type.clone(),
        resolved.values.clone(),
    )
}

fn endpoints<'a>(
    resolved: &BTreeMap<&str, &'a ResolvedConfig>,
    from: &str,
    to: &str,
) -> Result<(&'a ResolvedConfig, &'a ResolvedConfig), String> {
    let lookup = |name: &str| {
        resolved
            .get(name)
            .copied()
            .ok_or_else(|| format!("component '{}' is unresolved", name))
    };
    Ok((lookup(from)?, lookup(to)?))
}

fn component_errors(err: StratusError) -> Vec<String> {
    match err {
        StratusError::Resolve { source, .. } => source.messages(),
        other => vec![other.to_string()],
    }
}

impl std::fmt::Debug for SynthesisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
