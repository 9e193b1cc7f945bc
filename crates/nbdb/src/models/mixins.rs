//! Reusable model fragments.

use std::sync::Arc;

use nbdb_core::{
    FieldDef, FieldType, FrameworkConfig, ModelBuilder, ModelClass, Result, ScalarType, CREATED,
    DELETED, UPDATED,
};

/// `created`, `updated` and `deleted` lifecycle events.
pub fn basic_events(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::mixin("BasicEvents")
        .config(config)
        .events([CREATED, UPDATED, DELETED])
        .build()
}

/// Tenant/project the record belongs to, indexed for per-topic queries.
pub fn topic(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::mixin("Topic")
        .config(config)
        .field(FieldDef::optional("topic", FieldType::scalar(ScalarType::String)))
        .index("topic", "topic")
        .build()
}

/// Human-readable name.
pub fn name(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::mixin("Name")
        .config(config)
        .field(FieldDef::optional("name", FieldType::scalar(ScalarType::String)))
        .build()
}

/// Revision counter bumped by the writer on every change.
pub fn version(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::mixin("Version")
        .config(config)
        .field(FieldDef::optional("version", FieldType::scalar(ScalarType::Int)))
        .build()
}

/// Compact integer key used in dataplane metadata registers.
pub fn unique_key(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::mixin("UniqueKey")
        .config(config)
        .field(FieldDef::optional("unique_key", FieldType::scalar(ScalarType::Int)))
        .index("unique_key", "unique_key")
        .build()
}

/// Extend a builder with the mixins every tenant-owned network object uses:
/// name, topic, version, unique key and the basic lifecycle events.
pub(crate) fn tenant_object(builder: ModelBuilder, config: &FrameworkConfig) -> Result<ModelBuilder> {
    Ok(builder
        .extends(&name(config)?)
        .extends(&topic(config)?)
        .extends(&version(config)?)
        .extends(&unique_key(config)?)
        .extends(&basic_events(config)?))
}
