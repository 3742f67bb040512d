//! veildb - a minimal encrypted-at-rest document store
//!
//! Each collection is a single file holding a JSON array of records,
//! encrypted with its own 32-byte AES-256-GCM key. Collections are
//! namespaced by schema directories and mutated through a full
//! load-decrypt-modify-encrypt-persist cycle per operation.

pub mod cipher;
pub mod cli;
pub mod codec;
pub mod config;
pub mod http;
pub mod observability;
pub mod schema;
pub mod store;
