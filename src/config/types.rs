//! Engine configuration types

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::policies::DEFAULT_REQUIRED_TAGS;
use crate::domain::value_objects::{ComplianceFramework, ConfigValue, ConfigWarning};
use crate::error::StratusResult;

use super::loader;

/// Per-component-type partial configuration, keyed by component type.
pub type TypeDefaults = BTreeMap<String, ConfigValue>;

/// Engine configuration (`stratus.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    /// `[posture.<framework>.<type>]`
    #[serde(default)]
    pub posture: BTreeMap<String, TypeDefaults>,

    /// `[environments.<env>.<type>]`
    #[serde(default)]
    pub environments: BTreeMap<String, TypeDefaults>,

    #[serde(default)]
    pub enforcement: EnforcementConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Fallbacks used when a manifest leaves environment or framework unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub framework: ComplianceFramework,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            framework: ComplianceFramework::default(),
        }
    }
}

fn default_environment() -> String {
    "dev".to_string()
}

/// Organisation-wide baseline layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub defaults: TypeDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Tags every binding must carry
    #[serde(default = "default_required_tags")]
    pub required_tags: Vec<String>,

    /// Treat warning-severity violations as blocking
    #[serde(default)]
    pub warnings_as_errors: bool,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            required_tags: default_required_tags(),
            warnings_as_errors: false,
        }
    }
}

fn default_required_tags() -> Vec<String> {
    DEFAULT_REQUIRED_TAGS.iter().map(|t| t.to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    pub const NAMES: &'static [&'static str] = &["quiet", "normal", "verbose", "debug"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }
}

impl EngineConfig {
    /// File name looked up in the project root
    pub const FILE_NAME: &'static str = "stratus.toml";

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StratusResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> StratusResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `stratus.toml` from `project_root` if present, then apply `STRATUS_*` overrides.
    pub fn load_or_default(project_root: Option<&Path>) -> StratusResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (STRATUS_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    pub fn platform_defaults(&self, component_type: &str) -> Option<&ConfigValue> {
        self.platform.defaults.get(component_type)
    }

    /// Defaults for `component_type` under `framework`. Section keys accept the
    /// same aliases as the framework parser (`high`, `fedramp_high`, ...).
    pub fn posture_defaults(
        &self,
        framework: ComplianceFramework,
        component_type: &str,
    ) -> Option<&ConfigValue> {
        self.posture
            .iter()
            .find(|(key, _)| key.parse::<ComplianceFramework>().ok() == Some(framework))
            .and_then(|(_, types)| types.get(component_type))
    }

    pub fn environment_overrides(&self, environment: &str, component_type: &str) -> Option<&ConfigValue> {
        self.environments
            .get(environment)
            .and_then(|types| types.get(component_type))
    }

    /// `[posture]` section keys that name no known framework.
    pub fn unknown_posture_keys(&self) -> Vec<&str> {
        self.posture
            .keys()
            .filter(|key| key.parse::<ComplianceFramework>().is_err())
            .map(String::as_str)
            .collect()
    }
}
