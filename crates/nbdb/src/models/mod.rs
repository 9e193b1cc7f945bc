//! Standard northbound models.

pub mod l2;
pub mod l3;
pub mod mixins;

use std::sync::Arc;

use nbdb_core::{FrameworkConfig, ModelClass, Result};

pub use l2::{chassis, logical_port, logical_switch, LogicalPortHooks};
pub use l3::logical_router;

/// Build every standard concrete model, in registration order.
pub fn standard_models(config: &FrameworkConfig) -> Result<Vec<Arc<ModelClass>>> {
    Ok(vec![
        chassis(config)?,
        logical_switch(config)?,
        logical_port(config)?,
        logical_router(config)?,
    ])
}
