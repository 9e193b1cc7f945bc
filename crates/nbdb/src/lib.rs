//! nbdb - northbound database models for SDN controllers.
//!
//! Re-exports the model framework from [`nbdb_core`] and defines the
//! standard network models (chassis, switches, ports, routers) on top of it.
//!
//! ```
//! use nbdb::{init, FrameworkConfig, UPDATED};
//!
//! let registry = init(&FrameworkConfig::default())?;
//! let router = registry.get_model("lrouter")?;
//!
//! let mut cached = router.from_json(r#"{"id": "r1", "name": "edge"}"#)?;
//! let incoming = router.from_json(r#"{"id": "r1", "name": "edge-1"}"#)?;
//! let changed = cached.update(&incoming)?;
//! assert!(changed.contains("name"));
//! assert!(router.has_event(UPDATED));
//! # Ok::<(), nbdb::Error>(())
//! ```

pub mod legacy;
pub mod models;

use tracing::info;

pub use nbdb_core::*;

pub use legacy::legacy_models;
pub use models::{standard_models, LogicalPortHooks};

/// Build the process model registry: every standard model plus the legacy
/// table mapping.
pub fn init(config: &FrameworkConfig) -> Result<ModelRegistry> {
    let mut registry =
        ModelRegistry::new(config.registry.clone()).with_legacy(legacy_models(config)?);
    for class in standard_models(config)? {
        registry.register_model(class);
    }

    info!(
        models = registry.len(),
        legacy_tables = registry.legacy().len(),
        legacy_fallback = config.registry.legacy_fallback,
        "northbound models registered"
    );
    Ok(registry)
}
