//! Store error taxonomy.
//!
//! Every operation surfaces the first error it hits; there is no retry and
//! no rollback of steps already completed. The HTTP layer maps these onto
//! status codes via [`StoreError::status_code`]; the CLI prints them and
//! exits non-zero.

use std::io;
use thiserror::Error;

use crate::cipher::CipherError;
use crate::codec::CodecError;
use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by collection store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Create refused: the collection's data file is already present.
    #[error("collection {collection} already exists in {dir}")]
    AlreadyExists { collection: String, dir: String },

    /// Data or key file missing for a collection that was addressed.
    #[error("collection {0} does not exist")]
    CollectionNotFound(String),

    /// No record with the requested `_id` in the loaded collection.
    #[error("record with _id {0} not found")]
    RecordNotFound(String),

    /// Envelope or key failures from the cipher layer.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Malformed caller-supplied or stored JSON.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Schema directory could not be prepared.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Any other filesystem failure, with the step that hit it.
    #[error("{context}: {source}")]
    Io { context: String, source: io::Error },
}

impl StoreError {
    /// Wrap an I/O failure with the step it occurred in.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::AlreadyExists { .. } => 409,
            StoreError::CollectionNotFound(_) | StoreError::RecordNotFound(_) => 404,
            StoreError::Codec(_) => 400,
            // A cipher failure on stored data means the file pair is
            // damaged, not that the request was wrong.
            StoreError::Cipher(_) => 500,
            StoreError::Schema(_) | StoreError::Io { .. } => 500,
        }
    }

    /// Whether the caller, rather than the store, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let exists = StoreError::AlreadyExists {
            collection: "users".into(),
            dir: "/db/public".into(),
        };
        assert_eq!(exists.status_code(), 409);
        assert_eq!(
            StoreError::CollectionNotFound("users".into()).status_code(),
            404
        );
        assert_eq!(StoreError::RecordNotFound("abc".into()).status_code(), 404);
        assert_eq!(
            StoreError::Codec(CodecError::NotAnObject).status_code(),
            400
        );
        assert_eq!(
            StoreError::Cipher(CipherError::AuthenticationFailure).status_code(),
            500
        );
    }

    #[test]
    fn test_client_error_split() {
        assert!(StoreError::RecordNotFound("abc".into()).is_client_error());
        assert!(!StoreError::io(
            "failed to read collection file",
            io::Error::new(io::ErrorKind::Other, "disk"),
        )
        .is_client_error());
    }

    #[test]
    fn test_io_error_carries_context() {
        let err = StoreError::io(
            "failed to write key file",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("failed to write key file"));
        assert!(msg.contains("denied"));
    }
}
