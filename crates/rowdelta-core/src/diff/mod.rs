//! Snapshot diff engine.
//!
//! Compares a before- and an after-snapshot of the same table or query and
//! classifies each differing logical row as a creation, a modification or a
//! deletion.
//!
//! ## Entry point
//!
//! ```
//! use rowdelta_core::diff::{compute_changes, render_changes};
//! use rowdelta_core::model::{DataKind, Snapshot, ValueType};
//!
//! let users = |rows: Vec<Vec<rowdelta_core::model::Value>>| {
//!     Snapshot::builder(DataKind::Table, "users")
//!         .column("id", ValueType::Integer)
//!         .primary_key(["id"])
//!         .rows(rows)
//!         .build()
//!         .unwrap()
//! };
//! let changes = compute_changes(&users(vec![]), &users(vec![vec![1.into()]])).unwrap();
//! assert_eq!(changes.creations().len(), 1);
//! println!("{}", render_changes(&changes));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce the same changes in the same
//!   order, and byte-identical JSON.
//! - **Ordering**: before-rows first in their order, then after-only rows in
//!   theirs.
//! - **Schema drift**: only columns present on both sides are compared.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_changes, diff};
pub use human_summary::render_changes;
pub use model::{Change, ChangeType, Changes};
