//! Instance generators by class name.

use rustc_hash::FxHashMap;

use super::builtins::{EqGenerator, HashGenerator, OrdGenerator, ShowGenerator};
use crate::InstanceGenerator;

/// The generators a run may use, keyed by class name.
///
/// Passed explicitly to [`crate::derive_instances`]; there is no global
/// table.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: FxHashMap<&'static str, Box<dyn InstanceGenerator>>,
}

impl GeneratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Eq`, `Show`, `Ord` and `Hash`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(EqGenerator));
        registry.register(Box::new(ShowGenerator));
        registry.register(Box::new(OrdGenerator));
        registry.register(Box::new(HashGenerator));
        registry
    }

    /// Add a generator, returning the one it replaces.
    pub fn register(
        &mut self,
        generator: Box<dyn InstanceGenerator>,
    ) -> Option<Box<dyn InstanceGenerator>> {
        self.generators.insert(generator.class(), generator)
    }

    pub fn get(&self, class: &str) -> Option<&dyn InstanceGenerator> {
        self.generators.get(class).map(AsRef::as_ref)
    }

    /// Registered class names, sorted.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes: Vec<&'static str> = self.generators.keys().copied().collect();
        classes.sort_unstable();
        classes
    }
}
