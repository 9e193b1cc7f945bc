//! Field schema for model types.
//!
//! A schema is the ordered list of a model's fields. Names are fixed once the
//! model is built; records store their values positionally against it.

mod field;
mod index;
mod types;

use std::collections::HashMap;

pub use field::FieldDef;
pub use index::IndexKey;
pub use types::{FieldType, ScalarType};

/// Ordered field definitions with name lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDef>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, or replace an existing field of the same name in place.
    pub(crate) fn upsert(&mut self, field: FieldDef) {
        match self.positions.get(&field.name) {
            Some(&pos) => self.fields[pos] = field,
            None => {
                self.positions.insert(field.name.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.position(name).map(|pos| &self.fields[pos])
    }

    /// Position of a field in schema order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Check whether a field is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// All fields in schema order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Field names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
