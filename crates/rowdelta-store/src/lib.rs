//! rowdelta store - SQLite snapshot capture
//!
//! Provides:
//! - Connection helpers
//! - Table and query capture into rowdelta-core snapshots
//! - A start-point / end-point change recorder

pub mod db;
pub mod errors;
pub mod recorder;
pub mod source;

// Re-export key types
pub use errors::Result;
pub use recorder::ChangesRecorder;
pub use source::{capture_request, capture_table};
