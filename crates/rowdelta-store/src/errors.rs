//! Error handling for rowdelta-store
//!
//! Wraps rowdelta-core ExError with store-specific helpers

use rowdelta_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a missing-table error
pub fn table_not_found(table: &str) -> ExError {
    ExError::new(ExErrorKind::TableNotFound)
        .with_op("resolve_table")
        .with_entity_id(table)
        .with_message(format!("No table or view matches {}", table))
}

/// Create an error for a recorder used out of order
pub fn recorder_state(op: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(op)
        .with_message(reason.to_string())
}
