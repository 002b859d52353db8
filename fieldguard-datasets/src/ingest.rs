//! CSV ingestion.
//!
//! Spreadsheet uploads arrive as CSV. The first record is the header; header
//! names go through [`normalize_column_name`]. Empty cells become missing
//! values. Rows with a different field count than the header are rejected.

use crate::dataset::{Cell, Dataset, normalize_column_name};
use crate::error::DatasetResult;
use std::io::Read;
use tracing::debug;

/// Parses CSV from any reader into a [`Dataset`].
pub fn read_csv<R: Read>(reader: R) -> DatasetResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let name = normalize_column_name(raw);
            if name.is_empty() {
                format!("column_{}", index + 1)
            } else {
                name
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    let dataset = Dataset::from_rows(headers, rows)?;
    debug!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Parsed CSV dataset"
    );
    Ok(dataset)
}
