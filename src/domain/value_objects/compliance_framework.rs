//! Compliance Framework Value Object
//!
//! Defines the compliance posture a component or binding is synthesized under.
//! Postures form a strictness hierarchy; both the configuration defaults and the
//! enforcement rule tables are keyed by it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Compliance posture, ordered from most permissive to strictest.
///
/// - `Commercial`: baseline tier
/// - `FedrampModerate`: enhanced tier (default rules plus encryption/network checks)
/// - `FedrampHigh`: maximum tier (everything above plus key management and isolation)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceFramework {
    /// Baseline tier
    #[default]
    Commercial,
    /// Enhanced tier
    FedrampModerate,
    /// Maximum tier
    FedrampHigh,
}

impl ComplianceFramework {
    /// All frameworks, most permissive first.
    pub const ALL: [ComplianceFramework; 3] = [
        ComplianceFramework::Commercial,
        ComplianceFramework::FedrampModerate,
        ComplianceFramework::FedrampHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceFramework::Commercial => "commercial",
            ComplianceFramework::FedrampModerate => "fedramp-moderate",
            ComplianceFramework::FedrampHigh => "fedramp-high",
        }
    }

    /// Name of the strictness tier this framework occupies.
    pub fn tier_name(&self) -> &'static str {
        match self {
            ComplianceFramework::Commercial => "baseline",
            ComplianceFramework::FedrampModerate => "enhanced",
            ComplianceFramework::FedrampHigh => "maximum",
        }
    }

    /// True when `self` is at least as strict as `other`.
    pub fn is_at_least(&self, other: ComplianceFramework) -> bool {
        *self >= other
    }

    /// True for the FedRAMP tiers.
    pub fn is_fedramp(&self) -> bool {
        self.is_at_least(ComplianceFramework::FedrampModerate)
    }
}

impl fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown framework name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compliance framework '{0}' (expected commercial, fedramp-moderate or fedramp-high)")]
pub struct UnknownFramework(pub String);

impl FromStr for ComplianceFramework {
    type Err = UnknownFramework;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "commercial" | "baseline" => Ok(ComplianceFramework::Commercial),
            "fedramp-moderate" | "moderate" | "enhanced" => Ok(ComplianceFramework::FedrampModerate),
            "fedramp-high" | "high" | "maximum" => Ok(ComplianceFramework::FedrampHigh),
            _ => Err(UnknownFramework(s.to_string())),
        }
    }
}
