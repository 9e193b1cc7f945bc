//! Model types.
//!
//! A model is declared once during initialization with [`ModelBuilder`] and
//! finalized into an immutable [`ModelClass`] that records, event handles and
//! the registry all share.

mod builder;
mod class;

pub use builder::{ModelBuilder, ID_FIELD};
pub use class::{ModelClass, ModelKind};
