//! Resolve command handler

use std::path::Path;

use anyhow::{bail, Context, Result};

use stratus::application::{ComponentCatalog, ConfigBuilder};
use stratus::presentation::json::{emit_event, CompleteEvent, ItemEvent, StartEvent};
use stratus::presentation::output::render_resolved;
use stratus::{Manifest, StratusError};

const COMMAND: &str = "resolve";

pub fn cmd_resolve(
    manifest_path: &Path,
    component: &str,
    config_path: Option<&Path>,
    json: bool,
) -> Result<bool> {
    if json {
        emit_event(&StartEvent::new(COMMAND))?;
    }

    let config = super::load_engine_config(config_path)?;
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("failed to load manifest {}", manifest_path.display()))?;
    let Some(spec) = manifest.component(component) else {
        bail!(
            "component '{}' is not declared in {}",
            component,
            manifest_path.display()
        );
    };

    let framework = manifest
        .compliance_framework
        .unwrap_or(config.defaults.framework);
    let environment = manifest
        .environment
        .clone()
        .unwrap_or_else(|| config.defaults.environment.clone());

    let catalog = ComponentCatalog::builtin();
    let resolved = match ConfigBuilder::new(&config, &catalog).resolve(spec, framework, &environment) {
        Ok(resolved) => resolved,
        Err(StratusError::Resolve { component, source }) => bail!(
            "component '{}' failed to resolve:\n  {}",
            component,
            source.messages().join("\n  ")
        ),
        Err(err) => return Err(err.into()),
    };

    if json {
        emit_event(&ItemEvent::new("resolved", COMMAND, &resolved))?;
        emit_event(&CompleteEvent::success(COMMAND))?;
    } else {
        print!("{}", render_resolved(&resolved));
    }
    Ok(true)
}
