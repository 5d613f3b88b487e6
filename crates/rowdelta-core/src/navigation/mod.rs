//! Navigation between snapshots, changes, rows, columns and values.
//!
//! Each capability is a small trait implemented only by the types that
//! support it:
//!
//! | trait        | implemented by                         |
//! |--------------|----------------------------------------|
//! | [`ToChange`] | [`Changes`]                            |
//! | [`ToRow`]    | [`Snapshot`], [`Change`] (start, end)  |
//! | [`ToColumn`] | [`Snapshot`]                           |
//! | [`ToValue`]  | [`Row`], [`Column`]                    |
//!
//! Positional access past the end returns `IndexOutOfBounds` and unknown
//! names return `ColumnNotFound`; navigation never panics.

pub mod assertions;

use crate::diff::{Change, ChangeType, Changes};
use crate::errors::{ExError, Result, RowDeltaError};
use crate::model::{Column, Row, Snapshot, Value, ValueKey};

fn out_of_bounds(op: &str, what: &str, index: usize, size: usize) -> ExError {
    ExError::from(RowDeltaError::IndexOutOfBounds {
        what: what.to_string(),
        index,
        size,
    })
    .with_op(op)
}

/// Access to individual changes.
pub trait ToChange {
    fn change_count(&self) -> usize;

    /// # Errors
    ///
    /// - `IndexOutOfBounds` - `index` is not below [`change_count`](Self::change_count)
    fn change(&self, index: usize) -> Result<&Change>;

    /// The `index`-th change of one type.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfBounds` - fewer than `index + 1` changes of that type
    fn change_of_type(&self, change_type: ChangeType, index: usize) -> Result<&Change>;

    /// The change whose primary-key tuple equals `pk_values` (type-aware
    /// value equality), if any.
    fn change_on_pk(&self, pk_values: &[Value]) -> Option<&Change>;
}

impl ToChange for Changes {
    fn change_count(&self) -> usize {
        self.len()
    }

    fn change(&self, index: usize) -> Result<&Change> {
        self.as_slice()
            .get(index)
            .ok_or_else(|| out_of_bounds("change", "changes", index, self.len()))
    }

    fn change_of_type(&self, change_type: ChangeType, index: usize) -> Result<&Change> {
        self.iter()
            .filter(|c| c.change_type() == change_type)
            .nth(index)
            .ok_or_else(|| {
                let what = format!("{} changes", change_type);
                out_of_bounds("change_of_type", &what, index, self.count_of(change_type))
            })
    }

    fn change_on_pk(&self, pk_values: &[Value]) -> Option<&Change> {
        let wanted: Vec<ValueKey> = pk_values.iter().map(Value::key).collect();
        self.iter().find(|c| {
            !c.pk_values().is_empty()
                && c.pk_values().iter().map(Value::key).eq(wanted.iter().cloned())
        })
    }
}

/// Access to rows.
///
/// For a [`Change`] the navigable rows are the row at the start point
/// followed by the row at the end point, each only when present.
pub trait ToRow {
    fn navigable_rows(&self) -> Vec<&Row>;

    fn row_count(&self) -> usize {
        self.navigable_rows().len()
    }

    /// # Errors
    ///
    /// - `IndexOutOfBounds` - `index` is not below the row count
    fn row(&self, index: usize) -> Result<&Row> {
        let rows = self.navigable_rows();
        let size = rows.len();
        rows.get(index)
            .copied()
            .ok_or_else(|| out_of_bounds("row", "rows", index, size))
    }
}

impl ToRow for Snapshot {
    fn navigable_rows(&self) -> Vec<&Row> {
        self.rows().iter().map(|r| r.as_ref()).collect()
    }

    fn row_count(&self) -> usize {
        self.rows().len()
    }

    fn row(&self, index: usize) -> Result<&Row> {
        self.rows()
            .get(index)
            .map(|r| r.as_ref())
            .ok_or_else(|| out_of_bounds("row", "rows", index, self.rows().len()))
    }
}

impl ToRow for Change {
    fn navigable_rows(&self) -> Vec<&Row> {
        self.row_at_start_point()
            .into_iter()
            .chain(self.row_at_end_point())
            .map(|r| r.as_ref())
            .collect()
    }
}

/// Access to whole columns.
pub trait ToColumn {
    fn column_count(&self) -> usize;

    /// # Errors
    ///
    /// - `IndexOutOfBounds` - `index` is not below the column count
    fn column(&self, index: usize) -> Result<Column>;

    /// Column matched by name through the column letter case.
    ///
    /// # Errors
    ///
    /// - `ColumnNotFound` - no column matches `name`
    fn column_named(&self, name: &str) -> Result<Column>;
}

impl ToColumn for Snapshot {
    fn column_count(&self) -> usize {
        self.columns().len()
    }

    fn column(&self, index: usize) -> Result<Column> {
        if index >= self.columns().len() {
            return Err(out_of_bounds("column", "columns", index, self.columns().len()));
        }
        Ok(self.column_slice(index))
    }

    fn column_named(&self, name: &str) -> Result<Column> {
        let index = self.column_index(name).ok_or_else(|| {
            ExError::from(RowDeltaError::ColumnNotFound {
                data_name: self.name().to_string(),
                column: name.to_string(),
            })
            .with_op("column_named")
        })?;
        Ok(self.column_slice(index))
    }
}

/// Positional access to values.
///
/// A [`Row`] yields one value per column; a [`Column`] one value per row.
pub trait ToValue {
    fn value_count(&self) -> usize;

    /// # Errors
    ///
    /// - `IndexOutOfBounds` - `index` is not below the value count
    fn nth_value(&self, index: usize) -> Result<&Value>;
}

impl ToValue for Row {
    fn value_count(&self) -> usize {
        self.values().len()
    }

    fn nth_value(&self, index: usize) -> Result<&Value> {
        self.value_at(index)
    }
}

impl ToValue for Column {
    fn value_count(&self) -> usize {
        self.len()
    }

    fn nth_value(&self, index: usize) -> Result<&Value> {
        self.values()
            .get(index)
            .ok_or_else(|| out_of_bounds("column_value", "column values", index, self.len()))
    }
}
