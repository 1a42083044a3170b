//! Configuration loading

use std::fs;
use std::path::Path;

use crate::domain::services::suggest;
use crate::domain::value_objects::{ComplianceFramework, ConfigWarning};
use crate::error::{StratusError, StratusResult};

use super::env_validator::EnvVarValidator;
use super::types::{EngineConfig, Verbosity};

const FRAMEWORK_NAMES: &[&str] = &["commercial", "fedramp-moderate", "fedramp-high"];

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> StratusResult<(EngineConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse `content` as if it were read from `path`.
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> StratusResult<(EngineConfig, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: EngineConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| StratusError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut warnings: Vec<ConfigWarning> = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                suggestion: suggest(&key, KNOWN_KEYS.iter().copied()),
                line: find_line_number(content, &key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    for key in config.unknown_posture_keys() {
        warnings.push(ConfigWarning {
            key: format!("posture.{}", key),
            file: path.to_path_buf(),
            line: find_line_number(content, key),
            suggestion: suggest(key, FRAMEWORK_NAMES.iter().copied()),
        });
    }

    Ok((config, warnings))
}

/// Load `stratus.toml` from the project root, or defaults, then apply env overrides.
pub fn load_or_default(
    project_root: Option<&Path>,
) -> StratusResult<(EngineConfig, Vec<ConfigWarning>)> {
    let (config, warnings) = match project_root.map(|root| root.join(EngineConfig::FILE_NAME)) {
        Some(path) if path.exists() => load_with_warnings(&path)?,
        _ => (EngineConfig::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (STRATUS_* prefix)
pub fn with_env_overrides(config: EngineConfig) -> EngineConfig {
    with_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `lookup`.
pub fn with_overrides_from<F>(mut config: EngineConfig, lookup: F) -> EngineConfig
where
    F: Fn(&str) -> Option<String>,
{
    // STRATUS_ENVIRONMENT
    if let Some(env) = lookup("STRATUS_ENVIRONMENT") {
        let env = env.trim();
        if !env.is_empty() {
            config.defaults.environment = env.to_string();
        }
    }

    // STRATUS_COMPLIANCE_FRAMEWORK
    if let Some(framework) = lookup("STRATUS_COMPLIANCE_FRAMEWORK") {
        let validator = EnvVarValidator::new("STRATUS_COMPLIANCE_FRAMEWORK", FRAMEWORK_NAMES);
        config.defaults.framework = validator.parse(
            &framework,
            |s| s.parse::<ComplianceFramework>().ok(),
            config.defaults.framework,
        );
    }

    // STRATUS_VERBOSITY
    if let Some(verbosity) = lookup("STRATUS_VERBOSITY") {
        let validator = EnvVarValidator::new("STRATUS_VERBOSITY", Verbosity::NAMES);
        config.output.verbosity =
            validator.parse(&verbosity, Verbosity::parse, config.output.verbosity);
    }

    // STRATUS_WARNINGS_AS_ERRORS
    if let Some(val) = lookup("STRATUS_WARNINGS_AS_ERRORS") {
        config.enforcement.warnings_as_errors = val.to_lowercase() != "false" && val != "0";
    }

    config
}

const KNOWN_KEYS: &[&str] = &[
    "defaults",
    "environment",
    "framework",
    "platform",
    "posture",
    "environments",
    "enforcement",
    "required_tags",
    "warnings_as_errors",
    "output",
    "verbosity",
];

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}
