//! Core error types.

use thiserror::Error;

/// Result type for model framework operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Model framework errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A field name is not declared by the model.
    #[error("unknown field {field} on model {model}")]
    UnknownField {
        /// Model name.
        model: String,
        /// Offending field name.
        field: String,
    },

    /// Structured text could not be decoded.
    #[error(transparent)]
    Decode(#[from] nbdb_proto::Error),

    /// Unregister of a callback that is not subscribed.
    #[error("{subscriber} is not registered for {model}.{event}")]
    NotRegistered {
        /// Model name.
        model: String,
        /// Event name.
        event: String,
        /// Subscriber name.
        subscriber: String,
    },

    /// The model does not declare the event.
    #[error("model {model} does not declare event {event}")]
    UnknownEvent {
        /// Model name.
        model: String,
        /// Event name.
        event: String,
    },

    /// No registered or legacy model matches the key.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// An index was redeclared with a different key.
    #[error("index {index} on model {model} redeclared as {declared:?}, already {existing:?}")]
    IndexConflict {
        /// Model name.
        model: String,
        /// Index name.
        index: String,
        /// Key inherited or declared first.
        existing: Vec<String>,
        /// Conflicting key.
        declared: Vec<String>,
    },

    /// `update` across records with different schemas.
    #[error("cannot update {expected} from a {actual} record: schemas differ")]
    SchemaMismatch {
        /// Model of the record being updated.
        expected: String,
        /// Model of the source record.
        actual: String,
    },

    /// A value does not fit the field type.
    #[error("invalid value for {model}.{field}: expected {expected}")]
    InvalidValue {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
        /// Human-readable expected type.
        expected: String,
    },

    /// A required field is absent at encode time.
    #[error("required field {field} missing on model {model}")]
    MissingRequired {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
    },

    /// A lifecycle hook refused the operation.
    #[error("{model}.{hook} failed: {reason}")]
    Hook {
        /// Model name.
        model: String,
        /// Hook name.
        hook: &'static str,
        /// Reason given by the hook.
        reason: String,
    },

    /// Malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unknown_field(model: &str, field: &str) -> Self {
        Error::UnknownField {
            model: model.to_string(),
            field: field.to_string(),
        }
    }
}
