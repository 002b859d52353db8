//! Error types for the protection engine.

use fieldguard_crypto::CryptoError;
use fieldguard_datasets::DatasetError;
use thiserror::Error;

/// Result type for protection operations.
pub type ProtectResult<T> = Result<T, ProtectError>;

/// Request-scoped failures. None of these is fatal to the process.
#[derive(Debug, Error)]
pub enum ProtectError {
    /// No dataset has been loaded, or the loaded dataset has no rows.
    #[error("no data available, upload a dataset first")]
    NoData,

    /// A transform was requested with an empty confidential field selection.
    #[error("no confidential fields selected")]
    NoConfidentialFields,

    /// The requested transform name is not recognized.
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// Ciphertext could not be decrypted (wrong key, corruption or tampering).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Encryption or key handling failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Input was not a well-formed table.
    #[error("invalid tabular data: {0}")]
    TypeConversion(String),

    /// The dataset store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<DatasetError> for ProtectError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::NoData => Self::NoData,
            DatasetError::Database(e) => Self::Storage(e.to_string()),
            other => Self::TypeConversion(other.to_string()),
        }
    }
}

impl From<CryptoError> for ProtectError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decryption(msg) => Self::Decryption(msg),
            other => Self::Encryption(other.to_string()),
        }
    }
}
