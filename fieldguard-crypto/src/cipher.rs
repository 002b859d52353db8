//! ChaCha20-Poly1305 sealing of cell values.
//!
//! A sealed value travels as a text token:
//!
//! ```text
//! base64( version:1 | nonce:12 | ciphertext | tag:16 )
//! ```
//!
//! The version byte is authenticated as associated data, so a token cannot be
//! relabelled as another format without failing to open.

use crate::error::{CryptoError, CryptoResult};
use crate::key::EncryptionKey;
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use rand::RngCore;

/// Format byte written at the start of every token.
pub const TOKEN_VERSION: u8 = 1;

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

const HEADER_SIZE: usize = 1 + NONCE_SIZE;

/// A value sealed under one key, ready to be rendered as a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedValue {
    nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the tag appended.
    ciphertext: Vec<u8>,
}

impl SealedValue {
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Length of the plaintext that was sealed.
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }

    /// Renders the printable token stored in a cell.
    pub fn to_token(&self) -> String {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        bytes.push(TOKEN_VERSION);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(bytes)
    }

    /// Parses a token. Fails for anything that is not a well-formed token of
    /// the current version; it does not check authenticity.
    pub fn from_token(token: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(token)
            .map_err(|e| CryptoError::Decryption(format!("not a token: {e}")))?;

        if bytes.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::Decryption(format!(
                "token too short: {} bytes",
                bytes.len()
            )));
        }
        if bytes[0] != TOKEN_VERSION {
            return Err(CryptoError::Decryption(format!(
                "unsupported token version {}",
                bytes[0]
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[1..HEADER_SIZE]);
        Ok(Self {
            nonce,
            ciphertext: bytes[HEADER_SIZE..].to_vec(),
        })
    }
}

fn aead(key: &EncryptionKey) -> ChaCha20Poly1305 {
    ChaCha20Poly1305::new(key.as_bytes().into())
}

/// Seals `plaintext` under `key` with a fresh random nonce.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> CryptoResult<SealedValue> {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let payload = Payload {
        msg: plaintext,
        aad: &[TOKEN_VERSION],
    };
    let ciphertext = aead(key)
        .encrypt(Nonce::from_slice(&nonce), payload)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(SealedValue { nonce, ciphertext })
}

/// Opens a sealed value. Fails unless `key` is the key it was sealed under
/// and the value is unmodified.
pub fn open(key: &EncryptionKey, sealed: &SealedValue) -> CryptoResult<Vec<u8>> {
    let payload = Payload {
        msg: sealed.ciphertext.as_slice(),
        aad: &[TOKEN_VERSION],
    };
    aead(key)
        .decrypt(Nonce::from_slice(&sealed.nonce), payload)
        .map_err(|_| CryptoError::Decryption("wrong key or tampered token".to_string()))
}

/// Seals a string and renders its token.
pub fn seal_str(key: &EncryptionKey, plaintext: &str) -> CryptoResult<String> {
    Ok(seal(key, plaintext.as_bytes())?.to_token())
}

/// Parses and opens a token produced by [`seal_str`].
pub fn open_str(key: &EncryptionKey, token: &str) -> CryptoResult<String> {
    let plaintext = open(key, &SealedValue::from_token(token)?)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("plaintext is not UTF-8: {e}")))
}
