//! Component catalog
//!
//! Lookup of component definitions by type key.

use crate::components::all_components;
use crate::domain::ports::ComponentDefinition;

pub struct ComponentCatalog {
    definitions: Vec<Box<dyn ComponentDefinition>>,
}

impl ComponentCatalog {
    pub fn new(definitions: Vec<Box<dyn ComponentDefinition>>) -> Self {
        Self { definitions }
    }

    /// The built-in worker, queue and database types.
    pub fn builtin() -> Self {
        Self::new(all_components())
    }

    pub fn get(&self, component_type: &str) -> Option<&dyn ComponentDefinition> {
        self.definitions
            .iter()
            .find(|d| d.component_type() == component_type)
            .map(|d| d.as_ref())
    }

    pub fn types(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.component_type()).collect()
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
