//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// Anything a CLI command can fail with; all are fatal to the process.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("failed to format output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(std::io::Error),
}
