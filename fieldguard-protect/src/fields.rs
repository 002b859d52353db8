//! The set of columns selected for protection.

use fieldguard_datasets::normalize_column_name;
use serde::Serialize;

/// Where a confidential field selection came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Produced by the column classifier on load.
    #[default]
    Inferred,
    /// Set by the user, replacing the inferred selection.
    Explicit,
}

/// Column names marked confidential, deduplicated, in selection order.
///
/// Names are weak references: a name with no matching column is simply
/// skipped when a transform runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfidentialFieldSet {
    fields: Vec<String>,
    source: FieldSource,
}

impl ConfidentialFieldSet {
    pub fn inferred<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(names, FieldSource::Inferred)
    }

    /// User selection. Names are normalized like dataset headers.
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(names, FieldSource::Explicit)
    }

    fn build<I, S>(names: I, source: FieldSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<String> = Vec::new();
        for name in names {
            let name = normalize_column_name(name.as_ref());
            if !name.is_empty() && !fields.contains(&name) {
                fields.push(name);
            }
        }
        Self { fields, source }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f == column)
    }

    pub fn names(&self) -> &[String] {
        &self.fields
    }

    pub fn source(&self) -> FieldSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
