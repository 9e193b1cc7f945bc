//! nbdb core - the northbound database object model.
//!
//! Every piece of network intent a controller stores (switches, ports,
//! routers) is a [`Record`] of some [`ModelClass`]. This crate provides:
//!
//! - [`schema`] - declarative field schemas and index keys
//! - [`record`] - records with set-field tracking and diff-and-merge
//!   [`Record::update`]
//! - [`event`] - per-model subscriber registries with isolated-failure
//!   dispatch
//! - [`model`] - the one-time model finalization step ([`ModelBuilder`])
//! - [`registry`] - name/table/legacy model resolution
//! - [`hooks`] - lifecycle hooks run around storage operations
//! - [`config`] - framework configuration

pub mod config;
pub mod error;
pub mod event;
pub mod hooks;
pub mod model;
pub mod record;
pub mod registry;
pub mod schema;

pub use config::{DispatchConfig, FrameworkConfig, RecordConfig, RegistryConfig};
pub use error::{Error, Result};
pub use event::{Callback, EventArg, EventHandle, EventRegistry, SubscriberError, CREATED, DELETED, UPDATED};
pub use hooks::{ModelHooks, NoHooks};
pub use model::{ModelBuilder, ModelClass, ModelKind, ID_FIELD};
pub use record::Record;
pub use registry::{LegacyModels, ModelKey, ModelRegistry};
pub use schema::{FieldDef, FieldType, IndexKey, ScalarType, Schema};

/// Re-export value and codec types.
pub use nbdb_proto as proto;
pub use nbdb_proto::Value;
