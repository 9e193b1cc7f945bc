//! nbdb protocol types and serialization.
//!
//! This crate defines the values a northbound record field can hold and the
//! structured-text encoding used to persist a record's flat field set.
//!
//! # Modules
//!
//! - [`value`] - Runtime field values
//! - [`codec`] - JSON encoding of a flat field set
//! - [`error`] - Codec error types
//!
//! # Encoding
//!
//! Values serialize untagged, so an encoded record is a plain JSON object:
//!
//! ```
//! use nbdb_proto::{codec, Value};
//!
//! let text = codec::encode_object([("id", &Value::from("sw1")), ("mtu", &Value::from(1450))])
//!     .unwrap();
//! let fields = codec::decode_object(&text).unwrap();
//! assert_eq!(fields[0], ("id".to_string(), Value::from("sw1")));
//! ```

pub mod codec;
pub mod error;
pub mod value;

pub use error::Error;
pub use value::Value;
