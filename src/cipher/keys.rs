//! Per-collection content keys.
//!
//! Every collection is encrypted under its own 32-byte key, stored raw in a
//! sibling `.key` file. Keys are generated from the OS CSPRNG and never
//! derived from each other.

use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::{CipherError, CipherResult};

/// Length of a content key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key owned by exactly one collection.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentKey([u8; KEY_LEN]);

impl ContentKey {
    /// Generate a fresh key from the OS entropy source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Reconstruct a key from raw bytes read off disk.
    ///
    /// A key file of any other length is rejected, which covers truncated
    /// or overwritten key files before the AEAD ever sees them.
    pub fn from_bytes(bytes: &[u8]) -> CipherResult<Self> {
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CipherError::InvalidKey {
                    expected: KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw key bytes, for persisting to the key file.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Keep key material out of debug output.
impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentKey(..)")
    }
}
