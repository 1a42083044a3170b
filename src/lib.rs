//! Stratus - layered configuration resolution and capability compatibility engine
//!
//! Stratus resolves each component's effective configuration from an ordered
//! stack of partial layers, decides which wiring strategies apply between two
//! component types, and enforces compliance policy on proposed bindings before
//! anything is provisioned.

pub mod application;
pub mod binders;
pub mod components;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod presentation;

// Re-exports for convenience
pub use application::{SynthesisPipeline, SynthesisPlan, Verdict};
pub use config::EngineConfig;
pub use domain::entities::{ConfigLayer, LayerKind, LayerStack, ResolvedConfig, Schema};
pub use domain::policies::ComplianceEnforcer;
pub use domain::services::{BinderRegistry, ConfigResolver};
pub use domain::value_objects::{ComplianceFramework, ConfigValue};
pub use error::{StratusError, StratusResult};
pub use manifest::Manifest;
