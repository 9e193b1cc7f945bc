//! Model declaration.
//!
//! [`ModelBuilder`] is the one-time finalization step for a model type. It
//! composes the inherited schema, merges index and event declarations down
//! the parent chain, snapshots the field names, and creates the model's
//! event registry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use super::class::{ModelClass, ModelKind};
use crate::config::{DispatchConfig, FrameworkConfig, RecordConfig};
use crate::error::{Error, Result};
use crate::event::EventRegistry;
use crate::hooks::{ModelHooks, NoHooks};
use crate::schema::{FieldDef, FieldType, IndexKey, ScalarType, Schema};

/// Name of the identifier field every model inherits from the common root.
pub const ID_FIELD: &str = "id";

/// Declares a model or mixin and finalizes it with [`build`](Self::build).
pub struct ModelBuilder {
    name: String,
    kind: ModelKind,
    table_name: Option<String>,
    parents: Vec<Arc<ModelClass>>,
    fields: Vec<FieldDef>,
    indexes: Vec<(String, IndexKey)>,
    events: Vec<String>,
    hooks: Option<Arc<dyn ModelHooks>>,
    inherit_subscribers: bool,
    record_config: Option<RecordConfig>,
    dispatch: Option<DispatchConfig>,
}

impl ModelBuilder {
    /// Declare a model. It starts with the root `id` field and `id` index.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, ModelKind::Model)
    }

    /// Declare a mixin. Mixins have no implicit `id`.
    pub fn mixin(name: impl Into<String>) -> Self {
        Self::with_kind(name, ModelKind::Mixin)
    }

    fn with_kind(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            table_name: None,
            parents: Vec::new(),
            fields: Vec::new(),
            indexes: Vec::new(),
            events: Vec::new(),
            hooks: None,
            inherit_subscribers: false,
            record_config: None,
            dispatch: None,
        }
    }

    /// Set the storage table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table_name = Some(table.into());
        self
    }

    /// Compose a parent model or mixin. Parents are merged in the order
    /// given, before this model's own declarations.
    pub fn extends(mut self, parent: &Arc<ModelClass>) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Declare a field. Redeclaring an inherited field replaces it in place.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare several fields.
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare an index. A single field name and a one-element sequence are
    /// the same key.
    pub fn index(mut self, name: impl Into<String>, key: impl Into<IndexKey>) -> Self {
        self.indexes.push((name.into(), key.into()));
        self
    }

    /// Declare an event.
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Declare several events.
    pub fn events<S: Into<String>>(mut self, events: impl IntoIterator<Item = S>) -> Self {
        self.events.extend(events.into_iter().map(Into::into));
        self
    }

    /// Set lifecycle hooks. Without this the first parent with hooks
    /// supplies them.
    pub fn hooks(mut self, hooks: impl ModelHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Share the subscriber registry of the single parent instead of getting
    /// a fresh one, so subscribers of the parent's events also observe this
    /// model's emissions. The shared registry keeps the parent's dispatch
    /// settings; a different [`dispatch_config`](Self::dispatch_config) is
    /// rejected at build time.
    pub fn inherit_subscribers(mut self) -> Self {
        self.inherit_subscribers = true;
        self
    }

    /// Set record behaviour. Defaults to the first parent's.
    pub fn record_config(mut self, config: RecordConfig) -> Self {
        self.record_config = Some(config);
        self
    }

    /// Set dispatch behaviour for a fresh event registry.
    pub fn dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.dispatch = Some(config);
        self
    }

    /// Apply the record and dispatch sections of a framework config.
    pub fn config(self, config: &FrameworkConfig) -> Self {
        self.record_config(config.record.clone())
            .dispatch_config(config.dispatch.clone())
    }

    /// Finalize the model.
    pub fn build(self) -> Result<Arc<ModelClass>> {
        let schema = self.compose_schema();
        self.check_defaults(&schema)?;

        let indexes = self.merge_indexes()?;
        for key in indexes.values() {
            if let Some(field) = key.fields().iter().find(|f| !schema.contains(f)) {
                return Err(Error::unknown_field(&self.name, field));
            }
        }

        let mut events: BTreeSet<String> = self
            .parents
            .iter()
            .flat_map(|p| p.events().iter().cloned())
            .collect();
        events.extend(self.events.iter().cloned());

        let mut ancestors: Vec<String> = Vec::new();
        for parent in &self.parents {
            for name in std::iter::once(parent.name()).chain(parent.ancestors().iter().map(String::as_str)) {
                if !ancestors.iter().any(|a| a == name) {
                    ancestors.push(name.to_string());
                }
            }
        }

        let registry = self.event_registry()?;

        let (hooks, custom_hooks) = match &self.hooks {
            Some(hooks) => (Arc::clone(hooks), true),
            None => match self.parents.iter().find(|p| p.has_custom_hooks()) {
                Some(parent) => (Arc::clone(parent.hooks()), true),
                None => (Arc::new(NoHooks) as Arc<dyn ModelHooks>, false),
            },
        };

        let record_config = self
            .record_config
            .clone()
            .or_else(|| self.parents.first().map(|p| p.record_config().clone()))
            .unwrap_or_default();

        debug!(
            model = %self.name,
            table = ?self.table_name,
            fields = schema.len(),
            indexes = indexes.len(),
            events = ?events,
            "model built"
        );

        Ok(Arc::new(ModelClass {
            name: self.name,
            kind: self.kind,
            table_name: self.table_name,
            schema,
            indexes,
            events,
            ancestors,
            registry,
            hooks,
            custom_hooks,
            record_config,
        }))
    }

    fn compose_schema(&self) -> Schema {
        let mut schema = Schema::new();
        if self.kind == ModelKind::Model {
            schema.upsert(FieldDef::new(ID_FIELD, FieldType::scalar(ScalarType::String)));
        }
        for parent in &self.parents {
            for field in parent.schema().fields() {
                schema.upsert(field.clone());
            }
        }
        for field in &self.fields {
            schema.upsert(field.clone());
        }
        schema
    }

    fn check_defaults(&self, schema: &Schema) -> Result<()> {
        for field in schema.fields() {
            if let Some(default) = &field.default {
                if !field.field_type.accepts(default) {
                    return Err(Error::InvalidValue {
                        model: self.name.clone(),
                        field: field.name.clone(),
                        expected: field.field_type.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn merge_indexes(&self) -> Result<BTreeMap<String, IndexKey>> {
        let mut merged = BTreeMap::new();
        if self.kind == ModelKind::Model {
            merged.insert(ID_FIELD.to_string(), IndexKey::from(ID_FIELD));
        }

        let inherited = self
            .parents
            .iter()
            .flat_map(|p| p.indexes().iter().map(|(n, k)| (n.clone(), k.clone())));
        for (name, key) in inherited.chain(self.indexes.iter().cloned()) {
            match merged.get(&name) {
                Some(existing) if *existing != key => {
                    return Err(Error::IndexConflict {
                        model: self.name.clone(),
                        index: name,
                        existing: existing.fields().to_vec(),
                        declared: key.into_fields(),
                    });
                }
                Some(_) => {}
                None => {
                    merged.insert(name, key);
                }
            }
        }
        Ok(merged)
    }

    fn event_registry(&self) -> Result<Arc<EventRegistry>> {
        if self.inherit_subscribers {
            return match self.parents.as_slice() {
                [parent] => {
                    let shared = parent.event_registry();
                    match &self.dispatch {
                        Some(dispatch) if dispatch != shared.dispatch() => {
                            Err(Error::Config(format!(
                                "{}: dispatch config differs from the inherited registry of {}",
                                self.name,
                                parent.name()
                            )))
                        }
                        _ => Ok(Arc::clone(shared)),
                    }
                }
                _ => Err(Error::Config(format!(
                    "{}: inherit_subscribers requires exactly one parent",
                    self.name
                ))),
            };
        }

        let dispatch = self.dispatch.clone().unwrap_or_default();
        Ok(Arc::new(EventRegistry::new(self.name.clone(), dispatch)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Callback, CREATED, DELETED, UPDATED};
    use crate::record::Record;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn basic_events() -> Arc<ModelClass> {
        ModelBuilder::mixin("BasicEvents")
            .events([CREATED, UPDATED, DELETED])
            .build()
            .unwrap()
    }

    fn topic() -> Arc<ModelClass> {
        ModelBuilder::mixin("Topic")
            .field(FieldDef::optional("topic", FieldType::scalar(ScalarType::String)))
            .index("topic", "topic")
            .build()
            .unwrap()
    }

    #[test]
    fn test_root_id_field_and_index() {
        let class = ModelBuilder::new("Chassis").build().unwrap();

        assert_eq!(class.schema().names().collect::<Vec<_>>(), vec!["id"]);
        assert!(class.schema().get("id").unwrap().required);
        assert_eq!(class.index("id"), Some(&IndexKey::from(["id"])));
        assert!(class.events().is_empty());
    }

    #[test]
    fn test_mixin_has_no_id() {
        let mixin = topic();
        assert_eq!(mixin.kind(), ModelKind::Mixin);
        assert!(!mixin.schema().contains("id"));
        assert!(mixin.index("id").is_none());
    }

    #[test]
    fn test_index_normalization() {
        let bare = ModelBuilder::new("A").index("by_id", "id").build().unwrap();
        let tuple = ModelBuilder::new("B").index("by_id", ["id"]).build().unwrap();

        assert_eq!(bare.index("by_id"), tuple.index("by_id"));
    }

    #[test]
    fn test_inheritance_accumulates() {
        let switch = ModelBuilder::new("LogicalSwitch")
            .extends(&topic())
            .extends(&basic_events())
            .field(FieldDef::optional("mtu", FieldType::scalar(ScalarType::Int)))
            .index("mtu", "mtu")
            .event("segment_changed")
            .build()
            .unwrap();
        let vlan_switch = ModelBuilder::new("VlanSwitch").extends(&switch).build().unwrap();

        let indexes: Vec<_> = vlan_switch.indexes().keys().cloned().collect();
        assert_eq!(indexes, vec!["id", "mtu", "topic"]);
        assert!(vlan_switch.has_event(CREATED));
        assert!(vlan_switch.has_event("segment_changed"));
        assert_eq!(
            vlan_switch.schema().names().collect::<Vec<_>>(),
            vec!["id", "topic", "mtu"]
        );
        assert!(vlan_switch.is_a("Topic"));
        assert!(vlan_switch.is_a("LogicalSwitch"));
        assert!(!switch.is_a("VlanSwitch"));
        assert_eq!(vlan_switch.schema().len(), 3);
    }

    #[test]
    fn test_index_conflict() {
        let base = topic();
        let err = ModelBuilder::new("Port")
            .extends(&base)
            .field(FieldDef::optional("name", FieldType::scalar(ScalarType::String)))
            .index("topic", ["topic", "name"])
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::IndexConflict { ref index, .. } if index == "topic"));
    }

    #[test]
    fn test_identical_redeclaration_is_fine() {
        let class = ModelBuilder::new("Port")
            .extends(&topic())
            .index("topic", ["topic"])
            .build()
            .unwrap();
        assert_eq!(class.indexes().len(), 2);
    }

    #[test]
    fn test_index_on_undeclared_field() {
        let err = ModelBuilder::new("Port").index("name", "name").build().unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_default_must_fit_type() {
        let err = ModelBuilder::new("Port")
            .field(FieldDef::optional("mtu", FieldType::scalar(ScalarType::Int)).with_default("big"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_event_entry_points() {
        let class = ModelBuilder::new("Port")
            .extends(&basic_events())
            .event("bound")
            .build()
            .unwrap();

        assert_eq!(class.event("bound").unwrap().name(), "bound");
        assert!(matches!(
            class.event("unbound"),
            Err(Error::UnknownEvent { ref event, .. }) if event == "unbound"
        ));
        assert!(class
            .register("unbound", Callback::new("x", |_, _| Ok(())))
            .is_err());
    }

    #[test]
    fn test_subscribers_are_per_class() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);
        let parent = ModelBuilder::new("Port").extends(&basic_events()).build().unwrap();
        let child = ModelBuilder::new("TrunkPort").extends(&parent).build().unwrap();
        let shared = ModelBuilder::new("VirtualPort")
            .extends(&parent)
            .inherit_subscribers()
            .build()
            .unwrap();

        parent
            .register(
                CREATED,
                Callback::new("count", move |_, _| {
                    counted.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
            .unwrap();

        Record::new(&child, [("id", "c")]).unwrap().emit(CREATED, &[]).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        Record::new(&shared, [("id", "s")]).unwrap().emit(CREATED, &[]).unwrap();
        Record::new(&parent, [("id", "p")]).unwrap().emit(CREATED, &[]).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_inherit_subscribers_needs_one_parent() {
        let err = ModelBuilder::new("Orphan").inherit_subscribers().build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_inherit_subscribers_keeps_parent_dispatch() {
        let quiet = DispatchConfig::default().log_args(false);
        let parent = ModelBuilder::new("Port")
            .event(CREATED)
            .dispatch_config(quiet.clone())
            .build()
            .unwrap();

        let conflicting = ModelBuilder::new("TrunkPort")
            .extends(&parent)
            .inherit_subscribers()
            .dispatch_config(DispatchConfig::default())
            .build();
        assert!(matches!(conflicting, Err(Error::Config(_))));

        let child = ModelBuilder::new("TrunkPort")
            .extends(&parent)
            .inherit_subscribers()
            .dispatch_config(quiet.clone())
            .build()
            .unwrap();
        assert_eq!(child.event_registry().dispatch(), &quiet);
        assert!(Arc::ptr_eq(child.event_registry(), parent.event_registry()));
    }

    #[test]
    fn test_hooks_inherited_from_parent() {
        struct Stamp;
        impl ModelHooks for Stamp {
            fn on_create_pre(&self, record: &mut Record) -> Result<()> {
                record.set("topic", "stamped")
            }
        }

        let parent = ModelBuilder::new("Port").extends(&topic()).hooks(Stamp).build().unwrap();
        let child = ModelBuilder::new("TrunkPort").extends(&parent).build().unwrap();
        assert!(child.has_custom_hooks());

        let mut record = Record::new(&child, [("id", "t1")]).unwrap();
        record.on_create_pre().unwrap();
        assert_eq!(
            record.get("topic").unwrap().and_then(|v| v.as_str()),
            Some("stamped")
        );
    }

    #[test]
    fn test_record_config_applied() {
        let class = ModelBuilder::new("Loose")
            .config(&FrameworkConfig::default().with_record(RecordConfig::default().validate_on_encode(false)))
            .build()
            .unwrap();

        let record = Record::empty(&class);
        assert_eq!(record.to_json().unwrap(), "{}");
    }
}
