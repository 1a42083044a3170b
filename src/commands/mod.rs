//! Command handlers
//!
//! Each handler returns `Ok(true)` on success, `Ok(false)` when the command ran
//! but its verdict is negative, and `Err` when it could not run at all.

pub mod matrix;
pub mod plan;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};

use stratus::config::{ConfigWarning, EngineConfig};

/// Explicit `--config` file, or `./stratus.toml` when present, then `STRATUS_*` overrides.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let (config, warnings) = match path {
        Some(path) => {
            let (config, warnings) = EngineConfig::load_with_warnings(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            (config.with_env_overrides(), warnings)
        }
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            EngineConfig::load_or_default(Some(&cwd))?
        }
    };
    for warning in &warnings {
        eprintln!("{}", format_warning(warning));
    }
    Ok(config)
}

fn format_warning(warning: &ConfigWarning) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(suggestion) => format!(
            "Warning: unknown config key '{}' in {}. Did you mean '{}'?",
            warning.key, location, suggestion
        ),
        None => format!("Warning: unknown config key '{}' in {}", warning.key, location),
    }
}
