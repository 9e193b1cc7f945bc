//! Model registry.
//!
//! Resolves model classes from persisted or wire names: first by class name,
//! then by storage table name, then through the legacy-compatibility table.
//!
//! The registry is populated during process initialization through
//! `&mut self` and then shared read-only (typically behind an `Arc`), so
//! registration can never race with lookups.

mod legacy;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::model::ModelClass;

pub use legacy::LegacyModels;

/// Key accepted by [`ModelRegistry::get_model`].
#[derive(Debug, Clone, Copy)]
pub enum ModelKey<'a> {
    /// A class reference, returned unchanged.
    Class(&'a Arc<ModelClass>),
    /// A class name, table name or legacy table name.
    Name(&'a str),
}

impl<'a> From<&'a Arc<ModelClass>> for ModelKey<'a> {
    fn from(class: &'a Arc<ModelClass>) -> Self {
        ModelKey::Class(class)
    }
}

impl<'a> From<&'a str> for ModelKey<'a> {
    fn from(name: &'a str) -> Self {
        ModelKey::Name(name)
    }
}

impl<'a> From<&'a String> for ModelKey<'a> {
    fn from(name: &'a String) -> Self {
        ModelKey::Name(name)
    }
}

/// Process-scoped mapping from names to model classes.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    config: RegistryConfig,
    by_class_name: HashMap<String, Arc<ModelClass>>,
    by_table_name: HashMap<String, Arc<ModelClass>>,
    legacy: LegacyModels,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Attach the legacy-compatibility table.
    pub fn with_legacy(mut self, legacy: LegacyModels) -> Self {
        self.legacy = legacy;
        self
    }

    /// Register a class under its name and, if it has one, its table name.
    /// Returns the class.
    pub fn register_model(&mut self, class: Arc<ModelClass>) -> Arc<ModelClass> {
        if let Some(previous) = self
            .by_class_name
            .insert(class.name().to_string(), Arc::clone(&class))
        {
            warn!(model = %previous.name(), "model registered twice, replacing");
            if let Some(table) = previous.table_name() {
                if self
                    .by_table_name
                    .get(table)
                    .is_some_and(|claimed| Arc::ptr_eq(claimed, &previous))
                {
                    self.by_table_name.remove(table);
                }
            }
        }

        if let Some(table) = class.table_name() {
            if let Some(previous) = self
                .by_table_name
                .insert(table.to_string(), Arc::clone(&class))
            {
                if previous.name() != class.name() {
                    warn!(
                        table,
                        previous = %previous.name(),
                        model = %class.name(),
                        "table name claimed by another model, replacing"
                    );
                }
            }
        }

        debug!(model = %class.name(), table = ?class.table_name(), "model registered");
        class
    }

    /// Resolve a model.
    pub fn get_model<'a>(&self, key: impl Into<ModelKey<'a>>) -> Result<Arc<ModelClass>> {
        let name = match key.into() {
            ModelKey::Class(class) => return Ok(Arc::clone(class)),
            ModelKey::Name(name) => name,
        };

        if let Some(class) = self.by_class_name.get(name) {
            return Ok(Arc::clone(class));
        }
        if let Some(class) = self.by_table_name.get(name) {
            return Ok(Arc::clone(class));
        }
        if self.config.legacy_fallback {
            if let Some(class) = self.legacy.get(name) {
                debug!(table = name, model = %class.name(), "resolved through legacy table");
                return Ok(Arc::clone(class));
            }
        }

        Err(Error::ModelNotFound(name.to_string()))
    }

    /// Every registered class. Order is unspecified.
    pub fn iter_models(&self) -> impl Iterator<Item = &Arc<ModelClass>> {
        self.by_class_name.values()
    }

    /// Table names of registered classes, skipping classes without one.
    pub fn iter_tables(&self) -> impl Iterator<Item = &str> {
        self.iter_models().filter_map(|class| class.table_name())
    }

    /// The legacy-compatibility table.
    pub fn legacy(&self) -> &LegacyModels {
        &self.legacy
    }

    /// Registry settings.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.by_class_name.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_class_name.is_empty()
    }
}
