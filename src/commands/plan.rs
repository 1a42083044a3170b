//! Plan command handler

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use stratus::config::Verbosity;
use stratus::domain::entities::ComplianceAction;
use stratus::presentation::json::{emit_event, CompleteEvent, ItemEvent, StartEvent};
use stratus::presentation::output::{render_plan, render_plan_status, render_remediations};
use stratus::{BinderRegistry, ComplianceFramework, Manifest, SynthesisPipeline, SynthesisPlan};

const COMMAND: &str = "plan";

#[derive(Serialize)]
struct Summary<'a> {
    service: &'a str,
    framework: ComplianceFramework,
    environment: &'a str,
    provisionable: bool,
    blocking_reasons: Vec<String>,
    actions: Vec<&'a ComplianceAction>,
    generated_at: DateTime<Utc>,
}

pub fn cmd_plan(manifest_path: &Path, config_path: Option<&Path>, json: bool) -> Result<bool> {
    if json {
        emit_event(&StartEvent::new(COMMAND))?;
    }

    let config = super::load_engine_config(config_path)?;
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("failed to load manifest {}", manifest_path.display()))?;

    let verbosity = config.output.verbosity;
    let registry = Arc::new(BinderRegistry::with_builtin_strategies().sealed());
    let pipeline = SynthesisPipeline::new(registry, config)?;
    let plan = pipeline.plan(&manifest);
    let provisionable = plan.is_provisionable();

    if json {
        emit_plan(&plan)?;
        emit_event(&CompleteEvent::new(COMMAND, provisionable))?;
    } else {
        let unicode = std::io::stdout().is_terminal();
        match verbosity {
            Verbosity::Quiet => print!("{}", render_plan_status(&plan, unicode)),
            Verbosity::Normal => print!("{}", render_plan(&plan, unicode)),
            Verbosity::Verbose | Verbosity::Debug => {
                print!("{}", render_plan(&plan, unicode));
                print!("{}", render_remediations(&plan));
            }
        }
    }
    Ok(provisionable)
}

fn emit_plan(plan: &SynthesisPlan) -> Result<()> {
    for component in &plan.components {
        emit_event(&ItemEvent::new("component", COMMAND, component))?;
    }
    for binding in &plan.bindings {
        emit_event(&ItemEvent::new("binding", COMMAND, binding))?;
    }
    for trigger in &plan.triggers {
        emit_event(&ItemEvent::new("trigger", COMMAND, trigger))?;
    }
    let summary = Summary {
        service: &plan.service,
        framework: plan.framework,
        environment: &plan.environment,
        provisionable: plan.is_provisionable(),
        blocking_reasons: plan.blocking_reasons(),
        actions: plan.provisioning_actions(),
        generated_at: Utc::now(),
    };
    emit_event(&ItemEvent::new("summary", COMMAND, summary))?;
    Ok(())
}
