//! Workspace: the current dataset plus everything that describes it.
//!
//! One [`Workspace`] owns the store, the confidential field selection and the
//! transform state. Every operation takes the same lock, so a transform never
//! reads a half-replaced dataset and selection updates are never lost.
//!
//! `process` writes the transformed dataset to the store before it updates
//! the transform state; if the write fails, neither changes.

use crate::classify::{Classification, ColumnClassifier};
use crate::engine::ProtectionEngine;
use crate::error::{ProtectError, ProtectResult};
use crate::fields::ConfidentialFieldSet;
use crate::operation::Operation;
use crate::report::TransformReport;
use crate::state::TransformState;
use fieldguard_crypto::KeyInfo;
use fieldguard_datasets::{Dataset, DatasetId, DatasetStats, DatasetStore};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Returned by [`Workspace::load`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub dataset_id: DatasetId,
    pub rows: usize,
    pub columns: Vec<String>,
    pub classification: Classification,
    pub confidential_fields: ConfidentialFieldSet,
}

/// Returned by [`Workspace::process`].
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub dataset: Dataset,
    pub report: TransformReport,
}

/// Statistics over the plaintext columns of the current dataset.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceStats {
    pub stats: DatasetStats,
    /// Columns left out because they hold ciphertext.
    pub encrypted_columns: Vec<String>,
}

struct Inner {
    store: Box<dyn DatasetStore>,
    dataset_id: Option<DatasetId>,
    classification: Classification,
    fields: ConfidentialFieldSet,
    state: TransformState,
}

pub struct Workspace {
    engine: ProtectionEngine,
    classifier: ColumnClassifier,
    inner: Mutex<Inner>,
}

impl Workspace {
    /// Opens a workspace on `store` with the default classifier.
    ///
    /// The store is cleared: data left by an earlier process has unknown
    /// transform state and may be encrypted under a key this engine lacks.
    pub fn open(store: impl DatasetStore + 'static, engine: ProtectionEngine) -> ProtectResult<Self> {
        Self::with_classifier(store, engine, ColumnClassifier::default())
    }

    pub fn with_classifier(
        store: impl DatasetStore + 'static,
        engine: ProtectionEngine,
        classifier: ColumnClassifier,
    ) -> ProtectResult<Self> {
        let mut store: Box<dyn DatasetStore> = Box::new(store);
        store.clear()?;

        Ok(Self {
            engine,
            classifier,
            inner: Mutex::new(Inner {
                store,
                dataset_id: None,
                classification: Classification::default(),
                fields: ConfidentialFieldSet::default(),
                state: TransformState::default(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `dataset` current. Resets the confidential selection to the
    /// classifier's inference and marks every column plaintext.
    pub fn load(&self, dataset: Dataset) -> ProtectResult<LoadSummary> {
        let mut inner = self.lock();
        inner.store.replace(&dataset)?;

        let classification = self.classifier.classify(dataset.column_names());
        let fields = classification.to_field_set();
        let dataset_id = DatasetId::new();

        inner.dataset_id = Some(dataset_id);
        inner.classification = classification.clone();
        inner.fields = fields.clone();
        inner.state = TransformState::default();

        info!(
            dataset_id = %dataset_id,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            confidential = fields.len(),
            "Dataset loaded"
        );

        Ok(LoadSummary {
            dataset_id,
            rows: dataset.row_count(),
            columns: dataset.column_names().iter().map(|s| s.to_string()).collect(),
            classification,
            confidential_fields: fields,
        })
    }

    /// The current dataset.
    pub fn current_dataset(&self) -> ProtectResult<Dataset> {
        let inner = self.lock();
        Self::current(&inner)
    }

    fn current(inner: &Inner) -> ProtectResult<Dataset> {
        if inner.dataset_id.is_none() {
            return Err(ProtectError::NoData);
        }
        Ok(inner.store.load_current()?)
    }

    pub fn columns(&self) -> ProtectResult<Vec<String>> {
        let dataset = self.current_dataset()?;
        Ok(dataset.column_names().iter().map(|s| s.to_string()).collect())
    }

    pub fn classification(&self) -> Classification {
        self.lock().classification.clone()
    }

    pub fn confidential_fields(&self) -> ConfidentialFieldSet {
        self.lock().fields.clone()
    }

    /// Replaces the confidential selection until the next load or override.
    pub fn set_confidential_fields<I, S>(&self, names: I) -> ConfidentialFieldSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = ConfidentialFieldSet::explicit(names);
        let mut inner = self.lock();
        inner.fields = fields.clone();
        info!(fields = ?fields.names(), "Confidential fields set explicitly");
        fields
    }

    pub fn transform_state(&self) -> TransformState {
        self.lock().state.clone()
    }

    pub fn dataset_id(&self) -> Option<DatasetId> {
        self.lock().dataset_id
    }

    /// Runs an operation on the current dataset and commits the result.
    ///
    /// A failed decrypt commits [`DECRYPTION_FAILED_MARKER`](crate::DECRYPTION_FAILED_MARKER)
    /// for the affected cells, so their tokens are only in the returned report.
    pub fn process(&self, operation: Operation) -> ProtectResult<ProcessResult> {
        let mut inner = self.lock();
        let dataset = Self::current(&inner)?;

        let outcome = self.engine.run(
            &dataset,
            &inner.fields,
            &inner.classification,
            &inner.state,
            operation,
        )?;

        inner.store.replace(&outcome.dataset)?;
        inner.state = outcome.state;

        let mut report = outcome.report;
        report.dataset_id = inner.dataset_id;
        Ok(ProcessResult {
            dataset: outcome.dataset,
            report,
        })
    }

    /// Parses `name` and runs it. Unknown names leave the dataset untouched.
    pub fn process_named(&self, name: &str) -> ProtectResult<ProcessResult> {
        let operation: Operation = name.parse()?;
        self.process(operation)
    }

    /// Statistics for the current dataset, leaving out encrypted columns.
    pub fn statistics(&self) -> ProtectResult<WorkspaceStats> {
        let inner = self.lock();
        let dataset = Self::current(&inner)?;
        let stats = DatasetStats::compute_filtered(&dataset, |name| !inner.state.is_encrypted(name));
        Ok(WorkspaceStats {
            stats,
            encrypted_columns: inner.state.encrypted_columns().map(str::to_string).collect(),
        })
    }

    pub fn key_info(&self) -> KeyInfo {
        self.engine.codec().key_info()
    }
}
