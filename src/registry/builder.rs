//! Builder for assembling operation registries.

use crate::registry::builtins;
use crate::registry::error::BuildError;
use crate::registry::{Factory, Registry};
use std::collections::BTreeMap;

/// Builder for constructing registries with a fluent API.
///
/// Registration is construction-time only: once built, a [`Registry`]
/// cannot gain or lose operations.
#[derive(Default)]
pub struct RegistryBuilder {
    factories: Vec<(String, Factory)>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the built-in operations.
    pub fn with_builtins() -> Self {
        builtins::TABLE
            .iter()
            .fold(Self::new(), |builder, (name, factory)| {
                builder.register(*name, *factory)
            })
    }

    /// Register `factory` under `name`.
    pub fn register(mut self, name: impl Into<String>, factory: Factory) -> Self {
        self.factories.push((name.into(), factory));
        self
    }

    /// Build the registry.
    /// Returns an error on duplicate names or when nothing was registered.
    pub fn build(self) -> Result<Registry, BuildError> {
        if self.factories.is_empty() {
            return Err(BuildError::EmptyRegistry);
        }

        let mut table = BTreeMap::new();
        for (name, factory) in self.factories {
            if table.contains_key(&name) {
                return Err(BuildError::DuplicateOperation { name });
            }
            table.insert(name, factory);
        }

        tracing::debug!(operations = table.len(), "built operation registry");
        Ok(Registry::from_factories(table))
    }
}
