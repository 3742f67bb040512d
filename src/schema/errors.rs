//! Schema layer error types.

use std::io;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Filesystem failures while preparing a schema directory
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Directory creation failed (permissions, disk full, root unwritable).
    #[error("failed to create schema directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },

    /// Restricting the directory to owner-only access failed.
    #[error("failed to set permissions on {path}: {source}")]
    SetPermissions { path: String, source: io::Error },
}
