//! Column descriptors and column slices.

use serde::{Deserialize, Serialize};

use super::value::{Value, ValueType};

/// Name, declared type and nullability of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// A nullable column
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// The values of one column across every row of a snapshot, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    descriptor: ColumnDescriptor,
    values: Vec<Value>,
}

impl Column {
    pub(crate) fn new(descriptor: ColumnDescriptor, values: Vec<Value>) -> Self {
        Self { descriptor, values }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
