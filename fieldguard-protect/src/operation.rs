//! Operations a caller can request by name.

use crate::error::ProtectError;
use crate::transform::Transform;
use std::fmt;
use std::str::FromStr;

/// A requested protection operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Apply one forward transform to every confidential column.
    Apply(Transform),
    /// Reverse encryption on every encrypted confidential column.
    Decrypt,
    /// Apply each confidential column's category transform.
    Recommended,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Apply(t) => t.name(),
            Operation::Decrypt => "decrypt",
            Operation::Recommended => "recommended",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Apply(t) => t.label(),
            Operation::Decrypt => "Decryption",
            Operation::Recommended => "Recommended protection",
        }
    }
}

impl FromStr for Operation {
    type Err = ProtectError;

    /// Accepts canonical names and the `-ing`/`-ion` forms used by older clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mask" | "masking" => Operation::Apply(Transform::Mask),
            "hash" | "hashing" => Operation::Apply(Transform::Hash),
            "tokenize" | "tokenization" => Operation::Apply(Transform::Tokenize),
            "encrypt" | "encryption" => Operation::Apply(Transform::Encrypt),
            "apply_all" | "all" => Operation::Apply(Transform::ApplyAll),
            "decrypt" | "decryption" => Operation::Decrypt,
            "recommended" | "auto" => Operation::Recommended,
            _ => return Err(ProtectError::UnknownTransform(s.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Transform> for Operation {
    fn from(transform: Transform) -> Self {
        Operation::Apply(transform)
    }
}
