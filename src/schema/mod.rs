//! Schema namespace layer: maps (schema, collection) to files on disk.

mod errors;
mod layout;

pub use errors::{SchemaError, SchemaResult};
pub use layout::{SchemaLayout, DATA_EXT, KEY_EXT};
