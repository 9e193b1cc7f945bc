//! Finalized model types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use nbdb_proto::Value;

use crate::config::RecordConfig;
use crate::error::{Error, Result};
use crate::event::{Callback, EventArg, EventHandle, EventRegistry};
use crate::hooks::ModelHooks;
use crate::record::Record;
use crate::schema::{IndexKey, Schema};

/// Whether a class describes storable records or a reusable fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// A concrete model rooted at the common base (has an `id`).
    Model,
    /// A mixin contributing fields, indexes and events to models.
    Mixin,
}

/// An immutable model descriptor: schema, indexes, events, hooks and the
/// model's event registry.
///
/// Built once by [`ModelBuilder`](super::ModelBuilder) and shared by `Arc`
/// with every record of the model.
pub struct ModelClass {
    pub(super) name: String,
    pub(super) kind: ModelKind,
    pub(super) table_name: Option<String>,
    pub(super) schema: Schema,
    pub(super) indexes: BTreeMap<String, IndexKey>,
    pub(super) events: BTreeSet<String>,
    pub(super) ancestors: Vec<String>,
    pub(super) registry: Arc<EventRegistry>,
    pub(super) hooks: Arc<dyn ModelHooks>,
    pub(super) custom_hooks: bool,
    pub(super) record_config: RecordConfig,
}

impl ModelClass {
    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model kind.
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Storage table name, if the model declares one.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Field schema, inherited fields first.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All indexes, inherited ones included.
    pub fn indexes(&self) -> &BTreeMap<String, IndexKey> {
        &self.indexes
    }

    /// Key of a named index.
    pub fn index(&self, name: &str) -> Option<&IndexKey> {
        self.indexes.get(name)
    }

    /// All declared events, inherited ones included.
    pub fn events(&self) -> &BTreeSet<String> {
        &self.events
    }

    /// Whether the model declares an event.
    pub fn has_event(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    /// Names of every ancestor, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Whether this model is `name` or composes it.
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.ancestors.iter().any(|a| a == name)
    }

    /// Lifecycle hooks.
    pub fn hooks(&self) -> &Arc<dyn ModelHooks> {
        &self.hooks
    }

    /// Whether the hooks were supplied (here or by an ancestor) rather than
    /// defaulted.
    pub fn has_custom_hooks(&self) -> bool {
        self.custom_hooks
    }

    /// Record behaviour for this model.
    pub fn record_config(&self) -> &RecordConfig {
        &self.record_config
    }

    /// The subscriber registry. Shared with the parent when the model was
    /// built with `inherit_subscribers`.
    pub fn event_registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// Entry point for a declared event.
    pub fn event<'a>(&'a self, event: &str) -> Result<EventHandle<'a>> {
        let name = self
            .events
            .get(event)
            .ok_or_else(|| self.unknown_event(event))?;
        Ok(EventHandle::new(self, name))
    }

    /// Subscribe to a declared event.
    pub fn register(&self, event: &str, callback: Callback) -> Result<Callback> {
        Ok(self.event(event)?.register(callback))
    }

    /// Unsubscribe from a declared event.
    pub fn unregister(&self, event: &str, callback: &Callback) -> Result<()> {
        self.event(event)?.unregister(callback)
    }

    /// Deliver a declared event for `record`. Subscriber failures are logged,
    /// never returned; the only error is an undeclared event name.
    pub fn emit(&self, event: &str, record: &Record, args: &[EventArg]) -> Result<()> {
        self.event(event)?.emit(record, args);
        Ok(())
    }

    /// Create a record of this model.
    pub fn create<K, V, I>(self: &Arc<Self>, fields: I) -> Result<Record>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record::new(self, fields)
    }

    /// Decode a record of this model.
    pub fn from_json(self: &Arc<Self>, text: &str) -> Result<Record> {
        Record::from_json(self, text)
    }

    /// Run the post-read hook over a batch.
    pub fn on_get_all_post(&self, records: Vec<Record>) -> Vec<Record> {
        self.hooks.on_get_all_post(records)
    }

    /// Decode a "get all" batch and pass it through the post-read hook.
    /// Any decode failure fails the whole batch.
    pub fn decode_all<'t, I>(self: &Arc<Self>, texts: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let records = texts
            .into_iter()
            .map(|text| Record::from_json(self, text))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.on_get_all_post(records))
    }

    fn unknown_event(&self, event: &str) -> Error {
        Error::UnknownEvent {
            model: self.name.clone(),
            event: event.to_string(),
        }
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("table_name", &self.table_name)
            .field("fields", &self.schema.names().collect::<Vec<_>>())
            .field("indexes", &self.indexes)
            .field("events", &self.events)
            .field("ancestors", &self.ancestors)
            .finish_non_exhaustive()
    }
}
