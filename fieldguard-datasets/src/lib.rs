//! Tabular dataset handling for fieldguard.
//!
//! - [`Dataset`]: rectangular, text-valued table with normalized column names
//! - [`read_csv`]: ingestion of uploaded CSV
//! - [`DatasetStore`]: persistence boundary, with [`MemoryStore`] and [`SqliteStore`]
//! - [`DatasetStats`]: per-column numeric/text summaries

mod dataset;
mod error;
mod ingest;
mod sqlite;
mod stats;
mod store;

pub use dataset::{Cell, Column, Dataset, DatasetId, normalize_column_name};
pub use error::{DatasetError, DatasetResult};
pub use ingest::read_csv;
pub use sqlite::{DATA_TABLE, SqliteStore};
pub use stats::{ColumnStats, ColumnSummary, DatasetStats};
pub use store::{DatasetStore, MemoryStore};
