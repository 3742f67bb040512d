//! Codec error types.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from decoding or encoding collection content
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed JSON, caller-supplied or stored.
    #[error("invalid encoding: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The decrypted collection payload was not a JSON array of objects.
    #[error("invalid encoding: expected a JSON array of objects")]
    NotAnArray,

    /// Caller-supplied record data was not a JSON object.
    #[error("invalid encoding: expected a JSON object")]
    NotAnObject,
}
