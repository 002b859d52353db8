//! Persistence boundary.
//!
//! The protection engine only needs "give me the current dataset" and
//! "atomically replace it". How the rows are kept is up to the store.

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};

/// Storage for the single current dataset of a workspace.
pub trait DatasetStore: Send {
    /// Returns the current dataset, or [`DatasetError::NoData`] if none was stored.
    fn load_current(&self) -> DatasetResult<Dataset>;

    /// Replaces the current dataset in full. Readers never observe a partial write.
    fn replace(&mut self, dataset: &Dataset) -> DatasetResult<()>;

    /// Forgets the current dataset.
    fn clear(&mut self) -> DatasetResult<()>;
}

/// Store that keeps the dataset in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Option<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetStore for MemoryStore {
    fn load_current(&self) -> DatasetResult<Dataset> {
        self.current.clone().ok_or(DatasetError::NoData)
    }

    fn replace(&mut self, dataset: &Dataset) -> DatasetResult<()> {
        // A dataset without columns has nothing to persist, same as SqliteStore.
        self.current = if dataset.column_count() == 0 {
            None
        } else {
            Some(dataset.clone())
        };
        Ok(())
    }

    fn clear(&mut self) -> DatasetResult<()> {
        self.current = None;
        Ok(())
    }
}
