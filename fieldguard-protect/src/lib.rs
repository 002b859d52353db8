//! Field-level data protection for tabular data.
//!
//! The pieces, leaves first:
//! - [`transform`]: the closed set of per-value transforms and their null policy
//! - [`ColumnClassifier`]: keyword-table classification of column names
//! - [`TransformState`]: which columns currently hold ciphertext
//! - [`ProtectionEngine`]: applies an [`Operation`] to the confidential columns
//! - [`Workspace`]: the current dataset, selection and state behind one lock
//!
//! ```no_run
//! use fieldguard_crypto::{EncryptionCodec, EncryptionKey};
//! use fieldguard_datasets::{MemoryStore, read_csv};
//! use fieldguard_protect::{Operation, ProtectionEngine, Transform, Workspace};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = EncryptionKey::from_base64(&std::env::var("FIELDGUARD_KEY")?)?;
//! let engine = ProtectionEngine::new(EncryptionCodec::new(key));
//! let workspace = Workspace::open(MemoryStore::new(), engine)?;
//!
//! workspace.load(read_csv("email,salary\na@x.com,1000\n".as_bytes())?)?;
//! let result = workspace.process(Operation::Apply(Transform::Mask))?;
//! println!("{}", result.report.summary);
//! # Ok(())
//! # }
//! ```

mod classify;
mod engine;
mod error;
mod fields;
mod operation;
mod report;
mod state;
pub mod transform;
mod workspace;

pub use classify::{Category, ClassifiedColumn, Classification, ColumnClassifier, DEFAULT_KEYWORDS};
pub use engine::{ProtectionEngine, ProtectionOutcome};
pub use error::{ProtectError, ProtectResult};
pub use fields::{ConfidentialFieldSet, FieldSource};
pub use operation::Operation;
pub use report::{CellFailure, ColumnOutcome, ColumnReport, DECRYPTION_FAILED_MARKER, TransformReport};
pub use state::{ColumnState, TransformState};
pub use transform::{Transform, TransformConfig, TransformRegistry};
pub use workspace::{LoadSummary, ProcessResult, Workspace, WorkspaceStats};
