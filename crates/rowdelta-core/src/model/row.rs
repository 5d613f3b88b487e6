//! Rows of a snapshot.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use super::column::ColumnDescriptor;
use super::value::{Value, ValueKey};
use crate::errors::{ExError, Result, RowDeltaError};
use crate::letter_case::LetterCase;

/// One row of a snapshot: values aligned to the snapshot's columns plus the
/// projected primary-key tuple.
///
/// Rows are immutable and shared (`Arc<Row>`) between their snapshot and any
/// change that refers to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: usize,
    columns: Arc<[ColumnDescriptor]>,
    column_case: &'static LetterCase,
    values: Vec<Value>,
    pk_values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(
        index: usize,
        columns: Arc<[ColumnDescriptor]>,
        column_case: &'static LetterCase,
        values: Vec<Value>,
        pk_indexes: &[usize],
    ) -> Self {
        let pk_values = pk_indexes.iter().map(|&i| values[i].clone()).collect();
        Self {
            index,
            columns,
            column_case,
            values,
            pk_values,
        }
    }

    /// Same row re-keyed on other primary-key columns
    pub(crate) fn rekeyed(&self, pk_indexes: &[usize]) -> Self {
        Self::new(
            self.index,
            self.columns.clone(),
            self.column_case,
            self.values.clone(),
            pk_indexes,
        )
    }

    /// Position of this row in its snapshot
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Primary-key values, in key order; empty for keyless snapshots
    pub fn pk_values(&self) -> &[Value] {
        &self.pk_values
    }

    pub fn pk_key(&self) -> Vec<ValueKey> {
        self.pk_values.iter().map(Value::key).collect()
    }

    /// Index of a column, matched through the column letter case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| self.column_case.eq_str(&c.name, name))
    }

    /// Value of the named column, if the column exists
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.column_index(name).map(|i| &self.values[i])
    }

    /// Value of the named column.
    ///
    /// # Errors
    ///
    /// - `ColumnNotFound` - no column matches `name`
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| {
            ExError::from(RowDeltaError::ColumnNotFound {
                data_name: format!("row {}", self.index),
                column: name.to_string(),
            })
            .with_op("row_value")
        })
    }

    /// Value at a column position.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfBounds` - `index` is not below the column count
    pub fn value_at(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| {
            ExError::from(RowDeltaError::IndexOutOfBounds {
                what: "row values".to_string(),
                index,
                size: self.values.len(),
            })
            .with_op("row_value_at")
        })
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}
