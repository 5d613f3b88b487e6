//! Immutable captures of tabular data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::column::{Column, ColumnDescriptor};
use super::row::Row;
use super::value::{Value, ValueType};
use crate::config::LetterCaseSettings;
use crate::errors::{ExError, Result, RowDeltaError};

/// What a snapshot was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// A whole table
    Table,
    /// The result of a query
    Request,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Table => write!(f, "table"),
            DataKind::Request => write!(f, "request"),
        }
    }
}

/// An immutable capture of a table or query result at one point in time.
///
/// Column names are stored converted with the column letter case and
/// primary-key names with the primary-key letter case. Every row holds
/// exactly one value per column.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    kind: DataKind,
    name: String,
    columns: Arc<[ColumnDescriptor]>,
    primary_key: Vec<String>,
    rows: Vec<Arc<Row>>,
    #[serde(skip)]
    settings: LetterCaseSettings,
}

impl Snapshot {
    pub fn builder(kind: DataKind, name: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder {
            kind,
            name: name.into(),
            settings: LetterCaseSettings::default(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Table name or query text
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Primary-key column names in key order
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn settings(&self) -> &LetterCaseSettings {
        &self.settings
    }

    /// Index of a column, matched through the column letter case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let names = self.column_names();
        self.settings.column().position_in(&names, name)
    }

    /// Slice out one column across all rows.
    pub(crate) fn column_slice(&self, index: usize) -> Column {
        let values = self
            .rows
            .iter()
            .map(|row| row.values()[index].clone())
            .collect();
        Column::new(self.columns[index].clone(), values)
    }

    /// The same data keyed on another set of primary-key columns.
    ///
    /// An empty list makes the snapshot keyless.
    ///
    /// # Errors
    ///
    /// - `ColumnNotFound` - a key column does not exist in this snapshot
    pub fn with_primary_key<S: AsRef<str>>(&self, primary_key: &[S]) -> Result<Snapshot> {
        let primary_key = convert_primary_key(&self.settings, primary_key);
        let pk_indexes = resolve_pk_indexes(&self.name, &self.columns, &self.settings, &primary_key)?;
        let rows = self
            .rows
            .iter()
            .map(|row| Arc::new(row.rekeyed(&pk_indexes)))
            .collect();
        Ok(Snapshot {
            kind: self.kind,
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
            primary_key,
            settings: self.settings,
        })
    }
}

/// Incremental construction of a [`Snapshot`].
///
/// ```
/// use rowdelta_core::model::{DataKind, Snapshot, ValueType};
///
/// let snapshot = Snapshot::builder(DataKind::Table, "users")
///     .column("id", ValueType::Integer)
///     .column("name", ValueType::Text)
///     .primary_key(["id"])
///     .row(vec![1.into(), "Ada".into()])
///     .build()
///     .unwrap();
/// assert_eq!(snapshot.column_names(), vec!["ID", "NAME"]);
/// assert_eq!(snapshot.primary_key(), ["ID".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    kind: DataKind,
    name: String,
    settings: LetterCaseSettings,
    columns: Vec<ColumnDescriptor>,
    primary_key: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SnapshotBuilder {
    pub fn settings(mut self, settings: LetterCaseSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a nullable column
    pub fn column(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.columns.push(ColumnDescriptor::new(name, value_type));
        self
    }

    pub fn column_descriptor(mut self, descriptor: ColumnDescriptor) -> Self {
        self.columns.push(descriptor);
        self
    }

    pub fn columns(mut self, descriptors: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        self.columns.extend(descriptors);
        self
    }

    pub fn primary_key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<Value>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Validate and freeze the snapshot.
    ///
    /// # Errors
    ///
    /// - `RowShapeMismatch` - a row does not have one value per column
    /// - `ColumnNotFound` - a primary-key column does not exist
    pub fn build(self) -> Result<Snapshot> {
        let column_case = self.settings.column();
        let columns: Arc<[ColumnDescriptor]> = self
            .columns
            .into_iter()
            .map(|mut c| {
                c.name = column_case.convert_str(&c.name);
                c
            })
            .collect();

        let expected = columns.len();
        if let Some((row_index, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(ExError::from(RowDeltaError::RowShape {
                data_name: self.name.clone(),
                row_index,
                expected,
                actual: row.len(),
            })
            .with_op("build_snapshot"));
        }

        let primary_key = convert_primary_key(&self.settings, &self.primary_key);
        let pk_indexes = resolve_pk_indexes(&self.name, &columns, &self.settings, &primary_key)?;

        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, values)| {
                Arc::new(Row::new(
                    index,
                    columns.clone(),
                    column_case,
                    values,
                    &pk_indexes,
                ))
            })
            .collect();

        Ok(Snapshot {
            kind: self.kind,
            name: self.name,
            columns,
            rows,
            primary_key,
            settings: self.settings,
        })
    }
}

fn convert_primary_key<S: AsRef<str>>(settings: &LetterCaseSettings, names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| settings.primary_key().convert_str(n.as_ref()))
        .collect()
}

// Key columns are matched against column names with the column policy,
// since that is the policy the column names were stored under.
fn resolve_pk_indexes(
    data_name: &str,
    columns: &[ColumnDescriptor],
    settings: &LetterCaseSettings,
    primary_key: &[String],
) -> Result<Vec<usize>> {
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    primary_key
        .iter()
        .map(|pk| {
            settings.column().position_in(&names, pk).ok_or_else(|| {
                ExError::from(RowDeltaError::UnknownPrimaryKeyColumn {
                    data_name: data_name.to_string(),
                    column: pk.clone(),
                })
                .with_op("resolve_primary_key")
            })
        })
        .collect()
}
