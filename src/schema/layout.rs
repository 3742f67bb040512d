//! Filesystem layout for schemas and collections.
//!
//! A schema is a directory under the store root; a collection is a pair of
//! sibling files inside one:
//!
//! ```text
//! <root>/<schema>/<collection>.enc   — base64 AEAD envelope
//! <root>/<schema>/<collection>.key   — 32 raw key bytes
//! ```
//!
//! The empty schema name addresses the root directory itself. Directories
//! are created on first use with owner-only permissions and are never
//! deleted by any store operation.

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};

/// Extension of the encrypted data file.
pub const DATA_EXT: &str = "enc";
/// Extension of the raw key file.
pub const KEY_EXT: &str = "key";

/// Resolves (schema, collection) pairs to paths under one store root.
#[derive(Debug, Clone)]
pub struct SchemaLayout {
    root: PathBuf,
}

impl SchemaLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a schema's collections.
    pub fn schema_dir(&self, schema: &str) -> PathBuf {
        if schema.is_empty() {
            self.root.clone()
        } else {
            self.root.join(schema)
        }
    }

    /// Path of a collection's encrypted data file.
    pub fn data_path(&self, schema: &str, collection: &str) -> PathBuf {
        self.schema_dir(schema)
            .join(format!("{}.{}", collection, DATA_EXT))
    }

    /// Path of a collection's key file.
    pub fn key_path(&self, schema: &str, collection: &str) -> PathBuf {
        self.schema_dir(schema)
            .join(format!("{}.{}", collection, KEY_EXT))
    }

    /// Create the schema directory (and the root) if absent and restrict it
    /// to owner-only access. Idempotent.
    pub fn ensure_schema(&self, schema: &str) -> SchemaResult<PathBuf> {
        let dir = self.schema_dir(schema);

        fs::create_dir_all(&dir).map_err(|e| SchemaError::CreateDir {
            path: dir.display().to_string(),
            source: e,
        })?;
        restrict_dir(&dir)?;

        Ok(dir)
    }
}

#[cfg(unix)]
fn restrict_dir(dir: &Path) -> SchemaResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).map_err(|e| {
        SchemaError::SetPermissions {
            path: dir.display().to_string(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn restrict_dir(_dir: &Path) -> SchemaResult<()> {
    Ok(())
}
