//! rowdelta core - letter-case-aware snapshot diffing
//!
//! This crate provides the in-memory side of rowdelta:
//! - Identifier normalization with case conversion and comparison policies
//! - Snapshots of tables and query results with type-aware values
//! - The diff engine classifying row changes as creations, modifications
//!   or deletions, keyed by primary key
//! - Navigation traits and fluent assertions over changes
//!
//! Capturing snapshots from a live database lives in `rowdelta-store`.

pub mod config;
pub mod diff;
pub mod errors;
pub mod letter_case;
pub mod logging_facility;
pub mod model;
pub mod navigation;

pub use rowdelta_core_types as core_types;

// Re-export commonly used types
pub use config::{IdentifierKind, LetterCaseSettings};
pub use diff::{compute_changes, diff, Change, ChangeType, Changes};
pub use errors::{ExError, ExErrorKind, Result, RowDeltaError};
pub use letter_case::{CaseComparison, CaseConversion, LetterCase};
pub use model::{DataKind, Row, Snapshot, Value, ValueType};
