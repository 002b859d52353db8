//! Per-column record of reversible transforms.
//!
//! Each column is either plaintext or encrypted. The record has to match
//! what is actually in the cells: it is the only thing that says whether
//! decrypting a column is safe.

use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnState {
    #[default]
    Plaintext,
    Encrypted,
}

/// Which columns of the current dataset hold ciphertext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformState {
    encrypted: BTreeSet<String>,
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, column: &str) -> ColumnState {
        if self.encrypted.contains(column) {
            ColumnState::Encrypted
        } else {
            ColumnState::Plaintext
        }
    }

    pub fn is_encrypted(&self, column: &str) -> bool {
        self.encrypted.contains(column)
    }

    pub fn mark_encrypted(&mut self, column: &str) {
        self.encrypted.insert(column.to_string());
    }

    pub fn mark_plaintext(&mut self, column: &str) {
        self.encrypted.remove(column);
    }

    /// Encrypted column names, sorted.
    pub fn encrypted_columns(&self) -> impl Iterator<Item = &str> {
        self.encrypted.iter().map(String::as_str)
    }

    pub fn has_encrypted(&self) -> bool {
        !self.encrypted.is_empty()
    }
}
