//! Named per-value transforms.
//!
//! Every transform maps one cell to its protected form. Missing and blank
//! cells pass through every transform unchanged.
//!
//! | transform  | output                                              | reversible |
//! |------------|-----------------------------------------------------|------------|
//! | `mask`     | each character replaced; emails keep their domain   | no         |
//! | `hash`     | truncated hex SHA-256                               | no         |
//! | `tokenize` | prefix + truncated hex SHA-256 of a token domain    | no         |
//! | `encrypt`  | base64 ChaCha20-Poly1305 token                      | yes        |
//! | `apply_all`| hash, then mask, then tokenize, then encrypt        | no         |
//!
//! Masking preserves length, so it reveals how long the original was.
//! Truncated digests can collide. Tokens are derived from the value, so the
//! same input always gets the same token, across runs too.

use fieldguard_crypto::{CryptoResult, EncryptionCodec};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// The closed set of forward transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Mask,
    Hash,
    Tokenize,
    Encrypt,
    ApplyAll,
}

impl Transform {
    pub const ALL: [Transform; 5] = [
        Transform::Mask,
        Transform::Hash,
        Transform::Tokenize,
        Transform::Encrypt,
        Transform::ApplyAll,
    ];

    /// Canonical machine name.
    pub fn name(self) -> &'static str {
        match self {
            Transform::Mask => "mask",
            Transform::Hash => "hash",
            Transform::Tokenize => "tokenize",
            Transform::Encrypt => "encrypt",
            Transform::ApplyAll => "apply_all",
        }
    }

    /// Human label used in report summaries.
    pub fn label(self) -> &'static str {
        match self {
            Transform::Mask => "Masking",
            Transform::Hash => "Hashing",
            Transform::Tokenize => "Tokenization",
            Transform::Encrypt => "Encryption",
            Transform::ApplyAll => "Apply All",
        }
    }

    /// Only plain encryption has an inverse. `ApplyAll` ends in encryption
    /// but decrypting it yields a token, not the original value.
    pub fn is_reversible(self) -> bool {
        matches!(self, Transform::Encrypt)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transform-local settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub mask_char: char,
    /// Hex characters kept from the SHA-256 digest (at most 64).
    pub hash_length: usize,
    pub token_prefix: String,
    /// Hex characters in the token suffix (at most 64).
    pub token_length: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            mask_char: '*',
            hash_length: 10,
            token_prefix: "TOKEN_".to_string(),
            token_length: 8,
        }
    }
}

/// True for cells the null policy leaves alone.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Masks a value character by character.
///
/// Values shaped like `local@domain` only have the local part masked, so
/// `a@x.com` becomes `*@x.com`.
pub fn mask_value(value: &str, mask_char: char) -> String {
    let mask = |s: &str| -> String { s.chars().map(|_| mask_char).collect() };

    match value.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            format!("{}@{}", mask(local), domain)
        }
        _ => mask(value),
    }
}

/// One-way digest: hex SHA-256 truncated to `length` characters.
pub fn hash_value(value: &str, length: usize) -> String {
    let mut digest = hex::encode(Sha256::digest(value.as_bytes()));
    digest.truncate(length.min(64));
    digest
}

/// Stable synthetic identifier for a value.
///
/// Digested under a separate domain than [`hash_value`] so a token never
/// equals the hash of the same value.
pub fn tokenize_value(value: &str, prefix: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"fieldguard-token:");
    hasher.update(value.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(length.min(64));
    format!("{prefix}{digest}")
}

/// Applies transforms to single cells using one configuration.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    config: TransformConfig,
}

impl TransformRegistry {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transforms one cell. Blank cells are returned unchanged.
    ///
    /// Only `Encrypt` and `ApplyAll` can fail, and only if the AEAD does.
    pub fn apply(
        &self,
        transform: Transform,
        value: Option<&str>,
        codec: &EncryptionCodec,
    ) -> CryptoResult<Option<String>> {
        let Some(value) = value.filter(|v| !is_blank(Some(v))) else {
            return Ok(value.map(str::to_string));
        };

        let cfg = &self.config;
        let out = match transform {
            Transform::Mask => mask_value(value, cfg.mask_char),
            Transform::Hash => hash_value(value, cfg.hash_length),
            Transform::Tokenize => tokenize_value(value, &cfg.token_prefix, cfg.token_length),
            Transform::Encrypt => return codec.encrypt_value(Some(value)),
            Transform::ApplyAll => {
                let hashed = hash_value(value, cfg.hash_length);
                let masked = mask_value(&hashed, cfg.mask_char);
                let token = tokenize_value(&masked, &cfg.token_prefix, cfg.token_length);
                return codec.encrypt_value(Some(&token));
            }
        };
        Ok(Some(out))
    }

    /// Inverse of `Encrypt` for one cell. Blank cells are returned unchanged.
    pub fn decrypt(
        &self,
        value: Option<&str>,
        codec: &EncryptionCodec,
    ) -> CryptoResult<Option<String>> {
        if is_blank(value) {
            return Ok(value.map(str::to_string));
        }
        codec.decrypt_value(value)
    }
}
