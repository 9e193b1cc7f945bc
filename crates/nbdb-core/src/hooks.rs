//! Lifecycle hooks.
//!
//! The change-processing collaborator calls the `*_pre` hooks immediately
//! before the corresponding storage operation and `on_get_all_post` on every
//! batch freshly read with a "get all" query. Hooks must not write the same
//! record back to storage; nothing here guards against that recursion.

use crate::error::Result;
use crate::record::Record;

/// Per-model lifecycle hooks. Every method defaults to a no-op.
pub trait ModelHooks: Send + Sync {
    /// Called before a record is inserted for the first time.
    fn on_create_pre(&self, _record: &mut Record) -> Result<()> {
        Ok(())
    }

    /// Called before a record is updated.
    fn on_update_pre(&self, _record: &mut Record) -> Result<()> {
        Ok(())
    }

    /// Called before a record is removed.
    fn on_delete_pre(&self, _record: &mut Record) -> Result<()> {
        Ok(())
    }

    /// Filter or augment a freshly decoded batch. The caller replaces its
    /// working set with the returned records.
    fn on_get_all_post(&self, records: Vec<Record>) -> Vec<Record> {
        records
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ModelHooks for NoHooks {}
