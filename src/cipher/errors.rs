//! Cipher error types.

use thiserror::Error;

/// Result type for cipher operations
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors from envelope encryption and decryption
#[derive(Debug, Error)]
pub enum CipherError {
    /// The stored envelope is not valid base64 or is shorter than one nonce.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The authentication tag did not verify: wrong key, corrupted
    /// ciphertext, or a truncated tag.
    #[error("authentication failure: ciphertext rejected")]
    AuthenticationFailure,

    /// Key material has the wrong length for AES-256.
    #[error("invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    /// The AEAD refused to seal the plaintext.
    #[error("encryption failed")]
    SealFailed,
}
