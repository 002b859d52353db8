//! In-memory tabular model.
//!
//! A [`Dataset`] is an ordered list of named columns holding text cells.
//! Everything is text because persistence stores every value as `TEXT`;
//! a missing value is `None`.

use crate::error::{DatasetError, DatasetResult};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

/// A single cell value. `None` is a missing value.
pub type Cell = Option<String>;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalizes a raw header into a column name: trimmed, lower-cased, and
/// with each run of whitespace replaced by `_`.
pub fn normalize_column_name(raw: &str) -> String {
    WHITESPACE
        .replace_all(raw.trim(), "_")
        .to_lowercase()
}

/// Identifier assigned to each dataset load.
/// Uses UUID v7 so ids sort by load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Creates a new dataset ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Creates a column. The name is normalized when the column joins a [`Dataset`].
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Convenience constructor for columns without missing values.
    pub fn from_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, values.into_iter().map(|v| Some(v.into())).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `row`, flattened so that out-of-range and missing both read as `None`.
    pub fn get(&self, row: usize) -> Option<&str> {
        self.cells.get(row).and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A rectangular table of text cells.
///
/// Invariants, checked on construction and on every column replacement:
/// all columns have the same row count, and column names are unique after
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Builds a dataset, normalizing column names and validating shape.
    pub fn new(columns: Vec<Column>) -> DatasetResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        let mut normalized = Vec::with_capacity(columns.len());
        let expected = columns.first().map(Column::len).unwrap_or(0);

        for (index, column) in columns.into_iter().enumerate() {
            let name = normalize_column_name(&column.name);
            if name.is_empty() {
                return Err(DatasetError::EmptyColumnName(index));
            }
            if !seen.insert(name.clone()) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            if column.cells.len() != expected {
                return Err(DatasetError::RaggedColumn {
                    column: name,
                    expected,
                    actual: column.cells.len(),
                });
            }
            normalized.push(Column {
                name,
                cells: column.cells,
            });
        }

        Ok(Self {
            columns: normalized,
        })
    }

    /// Builds a dataset from a header row and row-major cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> DatasetResult<Self> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            if row.len() != columns.len() {
                return Err(DatasetError::RaggedColumn {
                    column: format!("row {}", columns.first().map(Column::len).unwrap_or(0)),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// True when there is nothing to transform: no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    /// Swaps in new cells for an existing column, keeping the row count.
    pub fn replace_column(&mut self, name: &str, cells: Vec<Cell>) -> DatasetResult<()> {
        let expected = self.row_count();
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))?;

        if cells.len() != expected {
            return Err(DatasetError::RaggedColumn {
                column: name.to_string(),
                expected,
                actual: cells.len(),
            });
        }

        column.cells = cells;
        Ok(())
    }

    /// Row-major view for presentation.
    pub fn rows(&self) -> Vec<Vec<Option<&str>>> {
        (0..self.row_count())
            .map(|row| self.columns.iter().map(|c| c.get(row)).collect())
            .collect()
    }
}
