//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, policies, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates engine configuration, manifest and domain services
//!
//! ## Use Cases
//!
//! - `SynthesisPipeline` - Resolve, look up, enforce and plan wiring for a manifest
//!
//! ## Services
//!
//! - `ConfigBuilder` - Assemble a component's layer stack and resolve it
//! - `ComponentCatalog` - Component definitions by type key

pub mod catalog;
pub mod config_builder;
pub mod synthesis;

pub use catalog::ComponentCatalog;
pub use config_builder::ConfigBuilder;
pub use synthesis::{ComponentOutcome, ConnectionOutcome, SynthesisPipeline, SynthesisPlan, Verdict};
