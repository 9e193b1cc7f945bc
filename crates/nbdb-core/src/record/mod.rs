//! Records: instances of a model.
//!
//! A record stores one [`Value`] per schema field plus the set of fields the
//! caller explicitly assigned. That distinction drives [`Record::update`]: a
//! sparse record only carries the fields its sender touched, and merging it
//! never disturbs anything else.

mod tracker;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use nbdb_proto::{codec, Value};
use tracing::trace;

use crate::error::{Error, Result};
use crate::event::EventArg;
use crate::model::ModelClass;

pub use tracker::SetFieldTracker;

/// An instance of a model.
#[derive(Clone)]
pub struct Record {
    class: Arc<ModelClass>,
    values: Vec<Value>,
    set_fields: SetFieldTracker,
}

impl Record {
    /// Create a record with every field at its default and nothing set.
    pub fn empty(class: &Arc<ModelClass>) -> Self {
        let schema = class.schema();
        Self {
            class: Arc::clone(class),
            values: schema.fields().iter().map(|f| f.initial_value()).collect(),
            set_fields: SetFieldTracker::with_len(schema.len()),
        }
    }

    /// Create a record from name/value pairs.
    ///
    /// Exactly the supplied names end up in the record's set fields, whether
    /// or not a value equals the field default. `Value::Null` is a legal
    /// value: it marks the field as explicitly cleared.
    pub fn new<K, V, I>(class: &Arc<ModelClass>, fields: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::empty(class);
        for (name, value) in fields {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Decode a record from its JSON encoding.
    ///
    /// Every key present in the document, `null` included, becomes a set
    /// field.
    pub fn from_json(class: &Arc<ModelClass>, text: &str) -> Result<Self> {
        let fields = codec::decode_object(text)?;
        Self::new(class, fields)
    }

    /// Encode the record as a JSON object of its non-null fields.
    pub fn to_json(&self) -> Result<String> {
        if self.class.record_config().validate_on_encode {
            self.validate()?;
        }
        let present = self.iter_fields().filter(|(_, v)| !v.is_null());
        Ok(codec::encode_object(present)?)
    }

    /// The record's non-null fields as a name-keyed map.
    pub fn to_struct(&self) -> BTreeMap<String, Value> {
        self.iter_fields()
            .filter(|(_, v)| !v.is_null())
            .map(|(name, v)| (name.to_string(), v.clone()))
            .collect()
    }

    /// Check that every required field holds a value.
    pub fn validate(&self) -> Result<()> {
        let missing = self
            .class
            .schema()
            .fields()
            .iter()
            .zip(&self.values)
            .find(|(field, value)| field.required && value.is_null());

        match missing {
            Some((field, _)) => Err(Error::MissingRequired {
                model: self.class.name().to_string(),
                field: field.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The record's model.
    pub fn class(&self) -> &Arc<ModelClass> {
        &self.class
    }

    /// Name of the record's model.
    pub fn model_name(&self) -> &str {
        self.class.name()
    }

    /// The `id` field, if the model has one and it is a string.
    pub fn id(&self) -> Option<&str> {
        self.class
            .schema()
            .position("id")
            .and_then(|pos| self.values[pos].as_str())
    }

    /// Current value of a field. `None` when the field is absent.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        let pos = self.position(name)?;
        let value = &self.values[pos];
        Ok((!value.is_null()).then_some(value))
    }

    /// Assign a field and mark it set. Assigning `Value::Null` marks the
    /// field as explicitly cleared.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let pos = self.position(name)?;
        let value = value.into();
        let field = &self.class.schema().fields()[pos];
        if !field.field_type.accepts(&value) {
            return Err(Error::InvalidValue {
                model: self.class.name().to_string(),
                field: field.name.clone(),
                expected: field.field_type.to_string(),
            });
        }
        self.values[pos] = field.field_type.normalize(value);
        self.set_fields.insert(pos);
        Ok(())
    }

    /// Reset a field to absent and forget that it was set. The field stays
    /// in the schema.
    pub fn clear(&mut self, name: &str) -> Result<()> {
        let pos = self.position(name)?;
        self.clear_at(pos);
        Ok(())
    }

    /// Whether a field was explicitly assigned. Undeclared names are never
    /// set.
    pub fn is_set(&self, name: &str) -> bool {
        self.class
            .schema()
            .position(name)
            .is_some_and(|pos| self.set_fields.contains(pos))
    }

    /// Names of the explicitly assigned fields, in schema order.
    pub fn set_fields(&self) -> impl Iterator<Item = &str> {
        let fields = self.class.schema().fields();
        self.set_fields.iter().map(move |pos| fields[pos].name.as_str())
    }

    /// Explicitly assigned fields with their values, in schema order.
    pub fn iter_set_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        let fields = self.class.schema().fields();
        self.set_fields
            .iter()
            .map(move |pos| (fields[pos].name.as_str(), &self.values[pos]))
    }

    /// Every field with its current value, in schema order.
    pub fn iter_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.class
            .schema()
            .names()
            .zip(self.values.iter())
    }

    /// Merge the explicitly set fields of `other` into this record.
    ///
    /// Only fields set on `other` are considered. An equal value is not a
    /// change. A different non-null value is assigned and marked set; a
    /// different null value clears the field. Returns the names of the
    /// fields that changed.
    ///
    /// Both records must share the same declared schema.
    pub fn update(&mut self, other: &Record) -> Result<BTreeSet<String>> {
        if !Arc::ptr_eq(&self.class, &other.class) && self.class.schema() != other.class.schema()
        {
            return Err(Error::SchemaMismatch {
                expected: self.class.name().to_string(),
                actual: other.class.name().to_string(),
            });
        }

        let mut changed = BTreeSet::new();
        for pos in other.set_fields.iter() {
            let new_value = &other.values[pos];
            if self.values[pos] == *new_value {
                continue;
            }

            changed.insert(self.class.schema().fields()[pos].name.clone());
            if new_value.is_null() {
                self.clear_at(pos);
            } else {
                self.values[pos] = new_value.clone();
                self.set_fields.insert(pos);
            }
        }

        trace!(model = %self.class.name(), id = ?self.id(), changed = ?changed, "record updated");
        Ok(changed)
    }

    /// Run the model's pre-create hook.
    pub fn on_create_pre(&mut self) -> Result<()> {
        let hooks = Arc::clone(self.class.hooks());
        hooks.on_create_pre(self)
    }

    /// Run the model's pre-update hook.
    pub fn on_update_pre(&mut self) -> Result<()> {
        let hooks = Arc::clone(self.class.hooks());
        hooks.on_update_pre(self)
    }

    /// Run the model's pre-delete hook.
    pub fn on_delete_pre(&mut self) -> Result<()> {
        let hooks = Arc::clone(self.class.hooks());
        hooks.on_delete_pre(self)
    }

    /// Emit a declared event of this record's model.
    pub fn emit(&self, event: &str, args: &[EventArg]) -> Result<()> {
        self.class.emit(event, self, args)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.class
            .schema()
            .position(name)
            .ok_or_else(|| Error::unknown_field(self.class.name(), name))
    }

    fn clear_at(&mut self, pos: usize) {
        self.values[pos] = Value::Null;
        self.set_fields.remove(pos);
    }
}

/// Records are equal when they belong to the same model and hold the same
/// field values. Which fields were set does not matter.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.class.name() == other.class.name() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.class.name())?;
        f.debug_map()
            .entries(self.iter_fields().filter(|(_, v)| !v.is_null()))
            .finish()
    }
}
