//! Column classification by name.
//!
//! A column is confidential when its (lower-cased) name contains one of the
//! keywords in the table. Categories are tried in table order and the first
//! match wins, so `email_address` is `Masking`, not `Encryption`.

use crate::fields::ConfidentialFieldSet;
use crate::transform::Transform;
use serde::Serialize;

/// Kind of protection a confidential column calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Masking,
    Hashing,
    Tokenization,
    Encryption,
}

impl Category {
    /// Transform applied to this category by `Operation::Recommended`.
    pub fn recommended_transform(self) -> Transform {
        match self {
            Category::Masking => Transform::Mask,
            Category::Hashing => Transform::Hash,
            Category::Tokenization => Transform::Tokenize,
            Category::Encryption => Transform::Encrypt,
        }
    }
}

/// Built-in keyword table, in tie-break order.
pub const DEFAULT_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Masking, &["email", "mail"]),
    (Category::Hashing, &["card", "credit", "debit"]),
    (Category::Tokenization, &["phone", "contact", "mobile"]),
    (Category::Encryption, &["address", "location", "salary"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedColumn {
    pub column: String,
    pub category: Category,
}

/// Confidential columns found by the classifier, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classification {
    columns: Vec<ClassifiedColumn>,
}

impl Classification {
    pub fn columns(&self) -> &[ClassifiedColumn] {
        &self.columns
    }

    pub fn category_of(&self, column: &str) -> Option<Category> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.category)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// The classified columns as an inferred confidential field set.
    pub fn to_field_set(&self) -> ConfidentialFieldSet {
        ConfidentialFieldSet::inferred(self.columns.iter().map(|c| c.column.as_str()))
    }
}

/// Keyword-table classifier. Pure: never touches the dataset.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    table: Vec<(Category, Vec<String>)>,
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::with_table(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(category, words)| {
                    (*category, words.iter().map(|w| w.to_string()).collect::<Vec<_>>())
                }),
        )
    }
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a classifier from a custom table. Keywords are matched case-insensitively.
    pub fn with_table<I>(table: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<String>)>,
    {
        let table = table
            .into_iter()
            .map(|(category, words)| {
                let words: Vec<String> = words
                    .into_iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (category, words)
            })
            .collect();
        Self { table }
    }

    /// Category of a single column name, if any keyword matches.
    pub fn category_of(&self, column: &str) -> Option<Category> {
        let name = column.to_lowercase();
        self.table
            .iter()
            .find(|(_, words)| words.iter().any(|w| name.contains(w.as_str())))
            .map(|(category, _)| *category)
    }

    /// Classifies a set of column names. Unmatched names are left out.
    pub fn classify<'a, I>(&self, columns: I) -> Classification
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns = columns
            .into_iter()
            .filter_map(|column| {
                self.category_of(column).map(|category| ClassifiedColumn {
                    column: column.to_string(),
                    category,
                })
            })
            .collect();
        Classification { columns }
    }
}
