//! Scalar value codec.
//!
//! [`EncryptionCodec`] owns one [`EncryptionKey`] for its whole lifetime and
//! encrypts or decrypts individual cell values. A missing value (`None`) is
//! passed through untouched in both directions.
//!
//! # Operational hazard
//!
//! The codec cannot recover from a lost key. Values encrypted by one codec can
//! only be decrypted by a codec holding the same key; if the key was generated
//! with [`EncryptionCodec::generate`] and never exported, dropping the codec
//! strands every value it encrypted.

use crate::cipher::{open_str, seal_str};
use crate::error::CryptoResult;
use crate::key::{EncryptionKey, KEY_SIZE};

/// Name of the AEAD construction used for tokens.
pub const ALGORITHM: &str = "ChaCha20-Poly1305";

/// Non-secret description of the key held by a codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInfo {
    pub algorithm: &'static str,
    pub key_bits: usize,
    pub fingerprint: String,
}

/// Encrypts and decrypts individual scalar values with a single key.
#[derive(Debug)]
pub struct EncryptionCodec {
    key: EncryptionKey,
}

impl EncryptionCodec {
    /// Creates a codec around a key supplied by configuration.
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Creates a codec with a freshly generated key.
    ///
    /// The key is not persisted anywhere. See the module docs.
    pub fn generate() -> Self {
        Self::new(EncryptionKey::generate())
    }

    /// Encrypts one value. `None` is returned unchanged.
    pub fn encrypt_value(&self, plaintext: Option<&str>) -> CryptoResult<Option<String>> {
        plaintext
            .map(|value| seal_str(&self.key, value))
            .transpose()
    }

    /// Decrypts one token produced by a codec holding the same key.
    ///
    /// Fails with [`crate::CryptoError::Decryption`] for malformed tokens,
    /// tokens from another key, and tampered tokens. `None` is returned
    /// unchanged.
    pub fn decrypt_value(&self, token: Option<&str>) -> CryptoResult<Option<String>> {
        token
            .map(|value| open_str(&self.key, value))
            .transpose()
    }

    /// Describes the key without exposing it.
    pub fn key_info(&self) -> KeyInfo {
        KeyInfo {
            algorithm: ALGORITHM,
            key_bits: KEY_SIZE * 8,
            fingerprint: self.key.fingerprint(),
        }
    }

    /// Borrows the key, e.g. to export a generated key once.
    pub fn key(&self) -> &EncryptionKey {
        &self.key
    }
}
