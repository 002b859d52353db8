//! SQLite-backed dataset store.
//!
//! The dataset lives in one table, `data`, with a `TEXT` column per dataset
//! column plus an `INTEGER PRIMARY KEY` ordinal that fixes row order. The
//! ordinal is found again by its primary-key flag, never by name, so a
//! dataset column called `rowid` cannot shadow it. `replace` drops and
//! recreates the table inside a single transaction, so a concurrent reader
//! sees either the old or the new table.

use crate::dataset::{Cell, Column, Dataset};
use crate::error::{DatasetError, DatasetResult};
use crate::store::DatasetStore;
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use tracing::{debug, info};

/// Name of the table holding the current dataset.
pub const DATA_TABLE: &str = "data";

/// Persistent store for the current dataset backed by SQLite.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened SQLite dataset store");
        Ok(Self { conn })
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> DatasetResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Splits the stored table into the ordinal column and the dataset columns.
    fn layout(&self) -> DatasetResult<TableLayout> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(DATA_TABLE)))?;
        let mut rows = stmt.query([])?;

        let mut layout = TableLayout::default();
        while let Some(row) = rows.next()? {
            let name: String = row.get(1)?;
            let pk: i64 = row.get(5)?;
            if pk > 0 && layout.ordinal.is_none() {
                layout.ordinal = Some(name);
            } else {
                layout.columns.push(name);
            }
        }
        Ok(layout)
    }
}

#[derive(Debug, Default)]
struct TableLayout {
    ordinal: Option<String>,
    columns: Vec<String>,
}

impl TableLayout {
    /// Column to order rows by. Tables without an ordinal fall back to the
    /// first rowid alias that no dataset column shadows.
    fn order_by(&self) -> Option<String> {
        if let Some(ordinal) = &self.ordinal {
            return Some(quote_ident(ordinal));
        }
        ["rowid", "_rowid_", "oid"]
            .into_iter()
            .find(|alias| !self.columns.iter().any(|c| c.eq_ignore_ascii_case(alias)))
            .map(str::to_string)
    }
}

/// Name for the ordinal column that no dataset column uses.
fn ordinal_name(dataset: &Dataset) -> String {
    let mut name = String::from("_fieldguard_row");
    while dataset
        .column_names()
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&name))
    {
        name.push('_');
    }
    name
}

impl DatasetStore for SqliteStore {
    fn load_current(&self) -> DatasetResult<Dataset> {
        let layout = self.layout()?;
        if layout.columns.is_empty() {
            return Err(DatasetError::NoData);
        }

        let select_list = layout
            .columns
            .iter()
            .map(|name| quote_ident(name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut query = format!("SELECT {} FROM {}", select_list, quote_ident(DATA_TABLE));
        if let Some(order) = layout.order_by() {
            query.push_str(&format!(" ORDER BY {order}"));
        }

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); layout.columns.len()];
        let mut stmt = self.conn.prepare(&query)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (index, column) in cells.iter_mut().enumerate() {
                column.push(row.get::<_, Option<String>>(index)?);
            }
        }

        let names = layout.columns;
        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Dataset::new(columns)
    }

    fn replace(&mut self, dataset: &Dataset) -> DatasetResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(DATA_TABLE)))?;

        if dataset.column_count() > 0 {
            let column_defs = dataset
                .column_names()
                .iter()
                .map(|name| format!("{} TEXT", quote_ident(name)))
                .collect::<Vec<_>>()
                .join(", ");
            tx.execute_batch(&format!(
                "CREATE TABLE {} ({} INTEGER PRIMARY KEY, {});",
                quote_ident(DATA_TABLE),
                quote_ident(&ordinal_name(dataset)),
                column_defs
            ))?;

            let column_list = dataset
                .column_names()
                .iter()
                .map(|name| quote_ident(name))
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = vec!["?"; dataset.column_count()].join(", ");
            let insert = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(DATA_TABLE),
                column_list,
                placeholders
            );

            let mut stmt = tx.prepare(&insert)?;
            for row in 0..dataset.row_count() {
                stmt.execute(params_from_iter(
                    dataset.columns().iter().map(|column| column.get(row)),
                ))?;
            }
            drop(stmt);
        }

        tx.commit()?;
        debug!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Replaced stored dataset"
        );
        Ok(())
    }

    fn clear(&mut self) -> DatasetResult<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(DATA_TABLE)))?;
        Ok(())
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
