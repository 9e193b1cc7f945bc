//! Layer-3 models.

use std::sync::Arc;

use nbdb_core::{FieldDef, FieldType, FrameworkConfig, ModelBuilder, ModelClass, Result, ScalarType};

use super::mixins::tenant_object;

/// Emitted by the writer when a router's static routes are recomputed.
pub const ROUTE_CHANGED: &str = "route_changed";

/// A logical router connecting switches through its `ports`.
///
/// `ports` holds `{"lswitch", "mac", "network"}` dictionaries and `routes`
/// holds `{"destination", "nexthop"}` dictionaries.
pub fn logical_router(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    tenant_object(ModelBuilder::new("LogicalRouter"), config)?
        .config(config)
        .table("lrouter")
        .fields([
            FieldDef::optional("ports", FieldType::list(FieldType::Dict)),
            FieldDef::optional("routes", FieldType::list(FieldType::Dict)),
            FieldDef::optional("gateway", FieldType::scalar(ScalarType::IpAddress)),
        ])
        .event(ROUTE_CHANGED)
        .build()
}
