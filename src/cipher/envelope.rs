//! Authenticated encryption of opaque payloads.
//!
//! A collection file holds exactly one envelope:
//!
//! ```text
//! base64( nonce (12 bytes) ‖ ciphertext ‖ GCM tag (16 bytes) )
//! ```
//!
//! The nonce is freshly random on every seal; reusing one under the same key
//! would void the AEAD guarantee, so there is deliberately no API that
//! accepts a caller-chosen nonce.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::{CipherError, CipherResult};
use super::keys::ContentKey;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

fn aead(key: &ContentKey) -> CipherResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKey {
        expected: super::keys::KEY_LEN,
        actual: key.as_bytes().len(),
    })
}

/// Seal `plaintext` under `key` into a text envelope.
///
/// The envelope structure is deterministic; its content is not (random
/// nonce, and GCM output depends on it).
pub fn encrypt(plaintext: &[u8], key: &ContentKey) -> CipherResult<String> {
    let cipher = aead(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CipherError::SealFailed)?;

    let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(raw))
}

/// Open a text envelope with `key`, returning the plaintext.
///
/// Fails with [`CipherError::MalformedEnvelope`] when the text is not valid
/// base64 or the decoded bytes are shorter than one nonce, and with
/// [`CipherError::AuthenticationFailure`] when the tag does not verify
/// (wrong key, corruption, truncation past the nonce).
pub fn decrypt(envelope: &str, key: &ContentKey) -> CipherResult<Vec<u8>> {
    let raw = STANDARD
        .decode(envelope.trim())
        .map_err(|e| CipherError::MalformedEnvelope(format!("invalid base64: {}", e)))?;

    if raw.len() < NONCE_LEN {
        return Err(CipherError::MalformedEnvelope(format!(
            "{} bytes is shorter than one nonce",
            raw.len()
        )));
    }

    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
    let cipher = aead(key)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::AuthenticationFailure)
}
