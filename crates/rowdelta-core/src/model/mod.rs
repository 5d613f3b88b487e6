pub mod column;
pub mod row;
pub mod snapshot;
pub mod value;

pub use column::{Column, ColumnDescriptor};
pub use row::Row;
pub use snapshot::{DataKind, Snapshot, SnapshotBuilder};
pub use value::{Value, ValueKey, ValueType};
