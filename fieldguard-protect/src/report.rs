//! Structured results of a protection run.

use crate::transform::Transform;
use fieldguard_datasets::DatasetId;
use serde::Serialize;

/// Written in place of a cell whose ciphertext could not be decrypted.
///
/// The marker replaces the token in the committed dataset, and the column is
/// no longer flagged as encrypted. The original token then survives only in
/// [`TransformReport::failures`] of the run that failed. Callers that want to
/// retry with another key must keep that report, because the stored dataset
/// cannot be decrypted again.
pub const DECRYPTION_FAILED_MARKER: &str = "[decryption failed]";

/// What happened to one confidential column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnOutcome {
    Transformed { transform: Transform },
    Decrypted,
    /// Encrypt requested on a column that already holds ciphertext.
    AlreadyEncrypted,
    /// Decrypt requested on a plaintext column.
    NotEncrypted,
    /// Irreversible transform requested on ciphertext; decrypt first.
    SkippedEncrypted,
    /// Recommended protection requested for a column with no category.
    NoCategory,
    Failed { reason: String },
}

impl ColumnOutcome {
    /// True if the column's cells were rewritten.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            ColumnOutcome::Transformed { .. } | ColumnOutcome::Decrypted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    #[serde(flatten)]
    pub outcome: ColumnOutcome,
}

/// A cell that could not be decrypted. `token` is the original ciphertext,
/// so it can still be recovered with the right key. It is the only copy:
/// the dataset holds [`DECRYPTION_FAILED_MARKER`] in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellFailure {
    pub column: String,
    pub row: usize,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub operation: String,
    pub dataset_id: Option<DatasetId>,
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
    /// Confidential names with no matching column.
    pub unmatched_fields: Vec<String>,
    pub failures: Vec<CellFailure>,
    pub summary: String,
}

impl TransformReport {
    /// Names of the columns whose cells changed.
    pub fn touched_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.outcome.changed())
            .map(|c| c.column.as_str())
            .collect()
    }

    pub fn outcome_of(&self, column: &str) -> Option<&ColumnOutcome> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| &c.outcome)
    }
}

/// Builds the one-paragraph summary shown to end users, e.g.
/// `Masking applied to 2 confidential field(s): email, phone.`
pub(crate) fn summarize(label: &str, columns: &[ColumnReport], failures: usize) -> String {
    let with = |pred: fn(&ColumnOutcome) -> bool| -> Vec<&str> {
        columns
            .iter()
            .filter(|c| pred(&c.outcome))
            .map(|c| c.column.as_str())
            .collect()
    };

    let touched = with(ColumnOutcome::changed);
    let mut parts = Vec::new();
    if touched.is_empty() {
        parts.push(format!("{label} made no changes."));
    } else {
        parts.push(format!(
            "{label} applied to {} confidential field(s): {}.",
            touched.len(),
            touched.join(", ")
        ));
    }

    let notes: [(&str, fn(&ColumnOutcome) -> bool); 5] = [
        ("Already encrypted", |o| matches!(o, ColumnOutcome::AlreadyEncrypted)),
        ("Not encrypted", |o| matches!(o, ColumnOutcome::NotEncrypted)),
        ("Skipped encrypted field(s), decrypt first", |o| {
            matches!(o, ColumnOutcome::SkippedEncrypted)
        }),
        ("No category", |o| matches!(o, ColumnOutcome::NoCategory)),
        ("Failed", |o| matches!(o, ColumnOutcome::Failed { .. })),
    ];
    for (title, pred) in notes {
        let names = with(pred);
        if !names.is_empty() {
            parts.push(format!("{title}: {}.", names.join(", ")));
        }
    }

    if failures > 0 {
        parts.push(format!("{failures} cell(s) could not be decrypted."));
    }

    parts.join(" ")
}
