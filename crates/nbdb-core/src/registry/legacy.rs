//! Legacy-compatibility table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::ModelClass;

/// Read-only fallback mapping from older table names to model classes.
///
/// Consulted only after both primary registry maps miss, so a table name
/// that is also registered normally always resolves to the primary entry.
#[derive(Debug, Clone, Default)]
pub struct LegacyModels {
    table_class_mapping: HashMap<String, Arc<ModelClass>>,
}

impl LegacyModels {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a legacy table name to a class.
    pub fn with_table(mut self, table: impl Into<String>, class: &Arc<ModelClass>) -> Self {
        self.table_class_mapping.insert(table.into(), Arc::clone(class));
        self
    }

    /// Look up a legacy table name.
    pub fn get(&self, table: &str) -> Option<&Arc<ModelClass>> {
        self.table_class_mapping.get(table)
    }

    /// Legacy table names.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.table_class_mapping.keys().map(String::as_str)
    }

    /// Number of mapped tables.
    pub fn len(&self) -> usize {
        self.table_class_mapping.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table_class_mapping.is_empty()
    }
}
