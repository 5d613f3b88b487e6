//! Change records produced by the diff engine.
//!
//! All types implement `Debug, Clone, Serialize, PartialEq`. Collections
//! keep the engine's emission order, which is deterministic.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::LetterCaseSettings;
use crate::model::{DataKind, Row, Value};

/// Classification of one logical row's change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Key absent before, present after
    Creation,
    /// Key present on both sides with at least one differing value
    Modification,
    /// Key present before, absent after
    Deletion,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Creation => write!(f, "CREATION"),
            ChangeType::Modification => write!(f, "MODIFICATION"),
            ChangeType::Deletion => write!(f, "DELETION"),
        }
    }
}

/// The classified delta for one logical row between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    change_type: ChangeType,
    data_kind: DataKind,
    data_name: String,
    pk_names: Vec<String>,
    pk_values: Vec<Value>,
    before: Option<Arc<Row>>,
    after: Option<Arc<Row>>,
    modified_columns: Vec<String>,
}

impl Change {
    pub(crate) fn creation(
        data_kind: DataKind,
        data_name: &str,
        pk_names: &[String],
        after: Arc<Row>,
    ) -> Self {
        Self {
            change_type: ChangeType::Creation,
            data_kind,
            data_name: data_name.to_string(),
            pk_names: pk_names.to_vec(),
            pk_values: after.pk_values().to_vec(),
            before: None,
            after: Some(after),
            modified_columns: Vec::new(),
        }
    }

    pub(crate) fn deletion(
        data_kind: DataKind,
        data_name: &str,
        pk_names: &[String],
        before: Arc<Row>,
    ) -> Self {
        Self {
            change_type: ChangeType::Deletion,
            data_kind,
            data_name: data_name.to_string(),
            pk_names: pk_names.to_vec(),
            pk_values: before.pk_values().to_vec(),
            before: Some(before),
            after: None,
            modified_columns: Vec::new(),
        }
    }

    pub(crate) fn modification(
        data_kind: DataKind,
        data_name: &str,
        pk_names: &[String],
        before: Arc<Row>,
        after: Arc<Row>,
        modified_columns: Vec<String>,
    ) -> Self {
        Self {
            change_type: ChangeType::Modification,
            data_kind,
            data_name: data_name.to_string(),
            pk_names: pk_names.to_vec(),
            pk_values: before.pk_values().to_vec(),
            before: Some(before),
            after: Some(after),
            modified_columns,
        }
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn data_kind(&self) -> DataKind {
        self.data_kind
    }

    /// Table name or query text the change was observed on
    pub fn data_name(&self) -> &str {
        &self.data_name
    }

    pub fn pk_names(&self) -> &[String] {
        &self.pk_names
    }

    /// Primary-key tuple identifying the logical row; empty for keyless data
    pub fn pk_values(&self) -> &[Value] {
        &self.pk_values
    }

    pub fn row_at_start_point(&self) -> Option<&Arc<Row>> {
        self.before.as_ref()
    }

    pub fn row_at_end_point(&self) -> Option<&Arc<Row>> {
        self.after.as_ref()
    }

    /// Names of the columns whose values differ (modifications only)
    pub fn modified_columns(&self) -> &[String] {
        &self.modified_columns
    }

    pub fn is_creation(&self) -> bool {
        self.change_type == ChangeType::Creation
    }

    pub fn is_modification(&self) -> bool {
        self.change_type == ChangeType::Modification
    }

    pub fn is_deletion(&self) -> bool {
        self.change_type == ChangeType::Deletion
    }
}

/// An ordered list of changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Changes {
    changes: Vec<Change>,
    #[serde(skip)]
    settings: LetterCaseSettings,
}

impl Default for Changes {
    fn default() -> Self {
        Self::new(Vec::new(), LetterCaseSettings::default())
    }
}

impl Changes {
    pub fn new(changes: Vec<Change>, settings: LetterCaseSettings) -> Self {
        Self { changes, settings }
    }

    /// Concatenate change lists, keeping each list's internal order.
    pub fn concat(parts: impl IntoIterator<Item = Changes>, settings: LetterCaseSettings) -> Self {
        let changes = parts.into_iter().flat_map(|c| c.changes).collect();
        Self::new(changes, settings)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    pub fn into_vec(self) -> Vec<Change> {
        self.changes
    }

    pub fn settings(&self) -> &LetterCaseSettings {
        &self.settings
    }

    pub fn count_of(&self, change_type: ChangeType) -> usize {
        self.changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .count()
    }

    /// Changes of one type, in their original order
    pub fn of_type(&self, change_type: ChangeType) -> Changes {
        self.filtered(|c| c.change_type == change_type)
    }

    pub fn creations(&self) -> Changes {
        self.of_type(ChangeType::Creation)
    }

    pub fn modifications(&self) -> Changes {
        self.of_type(ChangeType::Modification)
    }

    pub fn deletions(&self) -> Changes {
        self.of_type(ChangeType::Deletion)
    }

    /// Changes observed on a table, matched through the table letter case
    pub fn of_table(&self, table: &str) -> Changes {
        let table_case = self.settings.table();
        self.filtered(|c| c.data_kind == DataKind::Table && table_case.eq_str(&c.data_name, table))
    }

    fn filtered(&self, predicate: impl Fn(&Change) -> bool) -> Changes {
        Changes::new(
            self.changes.iter().filter(|c| predicate(c)).cloned().collect(),
            self.settings,
        )
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl IntoIterator for Changes {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
