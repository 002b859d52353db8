//! The protection engine.
//!
//! Given a dataset, the confidential selection and the current
//! [`TransformState`], the engine produces a transformed copy of the dataset,
//! the state that copy implies, and a report. It never mutates its inputs,
//! so the caller decides when the result becomes current.
//!
//! Per column, encryption is a two-state machine:
//!
//! ```text
//!   plaintext --encrypt--> encrypted --decrypt--> plaintext
//! ```
//!
//! Both transitions are no-ops when the column is already in the target
//! state. Irreversible transforms skip encrypted columns instead of
//! overwriting ciphertext.

use crate::classify::Classification;
use crate::error::{ProtectError, ProtectResult};
use crate::fields::ConfidentialFieldSet;
use crate::operation::Operation;
use crate::report::{
    CellFailure, ColumnOutcome, ColumnReport, DECRYPTION_FAILED_MARKER, TransformReport,
    summarize,
};
use crate::state::TransformState;
use crate::transform::{Transform, TransformConfig, TransformRegistry};
use fieldguard_crypto::EncryptionCodec;
use fieldguard_datasets::{Cell, Column, Dataset};
use tracing::{debug, info, warn};

/// Result of one engine run.
#[derive(Debug, Clone)]
pub struct ProtectionOutcome {
    pub dataset: Dataset,
    pub state: TransformState,
    pub report: TransformReport,
}

/// Applies transforms to confidential columns. Owns the codec and its key.
#[derive(Debug)]
pub struct ProtectionEngine {
    codec: EncryptionCodec,
    registry: TransformRegistry,
}

impl ProtectionEngine {
    pub fn new(codec: EncryptionCodec) -> Self {
        Self::with_config(codec, TransformConfig::default())
    }

    pub fn with_config(codec: EncryptionCodec, config: TransformConfig) -> Self {
        Self {
            codec,
            registry: TransformRegistry::new(config),
        }
    }

    pub fn codec(&self) -> &EncryptionCodec {
        &self.codec
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Runs any [`Operation`].
    ///
    /// `classification` is only consulted by [`Operation::Recommended`].
    pub fn run(
        &self,
        dataset: &Dataset,
        fields: &ConfidentialFieldSet,
        classification: &Classification,
        state: &TransformState,
        operation: Operation,
    ) -> ProtectResult<ProtectionOutcome> {
        match operation {
            Operation::Apply(transform) => self.apply(dataset, fields, state, transform),
            Operation::Decrypt => self.decrypt(dataset, fields, state),
            Operation::Recommended => {
                self.apply_recommended(dataset, fields, classification, state)
            }
        }
    }

    /// Applies `transform` to every confidential column present in `dataset`.
    pub fn apply(
        &self,
        dataset: &Dataset,
        fields: &ConfidentialFieldSet,
        state: &TransformState,
        transform: Transform,
    ) -> ProtectResult<ProtectionOutcome> {
        self.run_columns(dataset, fields, state, Operation::Apply(transform), |run, column| {
            run.forward(column, transform)
        })
    }

    /// Decrypts every encrypted confidential column.
    ///
    /// A cell that fails to decrypt is replaced by [`DECRYPTION_FAILED_MARKER`]
    /// and listed in the report with its original token; the rest of the
    /// column and the other columns are still processed. The report is the
    /// only place the failed token is kept.
    pub fn decrypt(
        &self,
        dataset: &Dataset,
        fields: &ConfidentialFieldSet,
        state: &TransformState,
    ) -> ProtectResult<ProtectionOutcome> {
        self.run_columns(dataset, fields, state, Operation::Decrypt, |run, column| {
            run.reverse(column)
        })
    }

    /// Applies to each confidential column the transform its category recommends.
    pub fn apply_recommended(
        &self,
        dataset: &Dataset,
        fields: &ConfidentialFieldSet,
        classification: &Classification,
        state: &TransformState,
    ) -> ProtectResult<ProtectionOutcome> {
        self.run_columns(dataset, fields, state, Operation::Recommended, |run, column| {
            match classification.category_of(column.name()) {
                Some(category) => run.forward(column, category.recommended_transform()),
                None => Ok(ColumnOutcome::NoCategory),
            }
        })
    }

    fn run_columns<F>(
        &self,
        dataset: &Dataset,
        fields: &ConfidentialFieldSet,
        state: &TransformState,
        operation: Operation,
        mut per_column: F,
    ) -> ProtectResult<ProtectionOutcome>
    where
        F: FnMut(&mut Run<'_>, &Column) -> ProtectResult<ColumnOutcome>,
    {
        if dataset.is_empty() {
            return Err(ProtectError::NoData);
        }
        if fields.is_empty() {
            return Err(ProtectError::NoConfidentialFields);
        }

        let mut run = Run {
            engine: self,
            dataset: dataset.clone(),
            state: state.clone(),
            failures: Vec::new(),
        };

        let mut columns = Vec::new();
        for column in dataset.columns().iter().filter(|c| fields.contains(c.name())) {
            let outcome = per_column(&mut run, column)?;
            debug!(column = %column.name(), ?outcome, "Processed confidential column");
            columns.push(ColumnReport {
                column: column.name().to_string(),
                outcome,
            });
        }

        let unmatched_fields = fields
            .names()
            .iter()
            .filter(|name| !dataset.has_column(name))
            .cloned()
            .collect();

        let summary = summarize(operation.label(), &columns, run.failures.len());
        info!(
            operation = %operation,
            rows = dataset.row_count(),
            failures = run.failures.len(),
            "{summary}"
        );

        let Run {
            dataset: transformed,
            state: next_state,
            failures,
            ..
        } = run;

        Ok(ProtectionOutcome {
            report: TransformReport {
                operation: operation.name().to_string(),
                dataset_id: None,
                rows: transformed.row_count(),
                columns,
                unmatched_fields,
                failures,
                summary,
            },
            dataset: transformed,
            state: next_state,
        })
    }
}

/// Working copy for one engine run.
struct Run<'a> {
    engine: &'a ProtectionEngine,
    dataset: Dataset,
    state: TransformState,
    failures: Vec<CellFailure>,
}

impl Run<'_> {
    fn forward(&mut self, column: &Column, transform: Transform) -> ProtectResult<ColumnOutcome> {
        let name = column.name();
        if self.state.is_encrypted(name) {
            return Ok(if transform == Transform::Encrypt {
                ColumnOutcome::AlreadyEncrypted
            } else {
                ColumnOutcome::SkippedEncrypted
            });
        }

        let engine = self.engine;
        let cells: Result<Vec<Cell>, _> = column
            .cells()
            .iter()
            .map(|cell| engine.registry.apply(transform, cell.as_deref(), &engine.codec))
            .collect();

        match cells {
            Ok(cells) => {
                self.dataset.replace_column(name, cells)?;
                if transform.is_reversible() {
                    self.state.mark_encrypted(name);
                }
                Ok(ColumnOutcome::Transformed { transform })
            }
            Err(e) => {
                warn!(column = %name, error = %e, "Column left unchanged after transform failure");
                Ok(ColumnOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn reverse(&mut self, column: &Column) -> ProtectResult<ColumnOutcome> {
        let name = column.name();
        if !self.state.is_encrypted(name) {
            return Ok(ColumnOutcome::NotEncrypted);
        }

        let engine = self.engine;
        let mut cells = Vec::with_capacity(column.len());
        for (row, cell) in column.cells().iter().enumerate() {
            match engine.registry.decrypt(cell.as_deref(), &engine.codec) {
                Ok(plain) => cells.push(plain),
                Err(e) => {
                    warn!(column = %name, row, error = %e, "Cell could not be decrypted");
                    self.failures.push(CellFailure {
                        column: name.to_string(),
                        row,
                        token: cell.clone().unwrap_or_default(),
                    });
                    cells.push(Some(DECRYPTION_FAILED_MARKER.to_string()));
                }
            }
        }

        self.dataset.replace_column(name, cells)?;
        self.state.mark_plaintext(name);
        Ok(ColumnOutcome::Decrypted)
    }
}
