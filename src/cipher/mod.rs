//! Authenticated encryption for collections at rest.
//!
//! This module knows nothing about records or files: it turns opaque byte
//! payloads into text envelopes under a per-collection [`ContentKey`] and
//! back. All confidentiality guarantees of the store live here.

mod envelope;
mod errors;
mod keys;

pub use envelope::{decrypt, encrypt, NONCE_LEN};
pub use errors::{CipherError, CipherResult};
pub use keys::{ContentKey, KEY_LEN};
