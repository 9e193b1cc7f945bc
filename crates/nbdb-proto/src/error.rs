//! Codec error types.

use thiserror::Error;

/// Encoding and decoding errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding a field set failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The input text is not a well-formed record document.
    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Error::Decode(err.to_string())
    }
}
