//! Encryption layer for fieldguard.
//!
//! - [`cipher`]: ChaCha20-Poly1305 sealing into versioned base64 tokens
//! - [`key`]: key material, base64 configuration parsing, Argon2id derivation
//! - [`codec`]: per-value encrypt/decrypt used by the protection engine

pub mod cipher;
pub mod codec;
mod error;
pub mod key;

pub use cipher::{NONCE_SIZE, SealedValue, TAG_SIZE, TOKEN_VERSION, open, open_str, seal, seal_str};
pub use codec::{ALGORITHM, EncryptionCodec, KeyInfo};
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE, KdfParams, SALT_SIZE, Salt, derive_key};
