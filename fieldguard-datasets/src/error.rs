//! Error types for dataset handling.

use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while building, parsing or persisting datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No dataset has been stored yet.
    #[error("no dataset loaded")]
    NoData,

    /// CSV input could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Two columns normalize to the same name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A column name is blank after normalization.
    #[error("column {0} has an empty name")]
    EmptyColumnName(usize),

    /// Columns have differing row counts.
    #[error("column {column} has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Referenced column does not exist.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
