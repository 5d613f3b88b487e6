//! Fluent assertions on change lists and single changes.
//!
//! Failures panic with a message describing what was expected and what was
//! found, pointing at the caller's line.
//!
//! ```
//! use rowdelta_core::diff::compute_changes;
//! use rowdelta_core::model::{DataKind, Snapshot, ValueType};
//! use rowdelta_core::navigation::assertions::assert_that;
//!
//! let build = |rows: Vec<Vec<rowdelta_core::model::Value>>| {
//!     Snapshot::builder(DataKind::Table, "users")
//!         .column("id", ValueType::Integer)
//!         .column("name", ValueType::Text)
//!         .primary_key(["id"])
//!         .rows(rows)
//!         .build()
//!         .unwrap()
//! };
//! let before = build(vec![vec![1.into(), "Ada".into()]]);
//! let after = build(vec![vec![1.into(), "Grace".into()]]);
//! let changes = compute_changes(&before, &after).unwrap();
//!
//! assert_that(&changes)
//!     .has_number_of_changes(1)
//!     .has_number_of_modifications(1)
//!     .change(0)
//!     .is_modification()
//!     .has_pks([1])
//!     .has_modified_columns(&["name"]);
//! ```

use crate::config::LetterCaseSettings;
use crate::diff::{Change, ChangeType, Changes};
use crate::model::Value;

pub fn assert_that(changes: &Changes) -> ChangesAssert<'_> {
    ChangesAssert { changes }
}

/// Assertions on a single change, with default letter-case settings.
pub fn assert_that_change(change: &Change) -> ChangeAssert<'_> {
    ChangeAssert {
        change,
        settings: LetterCaseSettings::default(),
    }
}

pub struct ChangesAssert<'a> {
    changes: &'a Changes,
}

impl<'a> ChangesAssert<'a> {
    #[track_caller]
    pub fn has_number_of_changes(self, expected: usize) -> Self {
        let actual = self.changes.len();
        assert!(
            actual == expected,
            "expected {} change(s) but found {}",
            expected,
            actual
        );
        self
    }

    #[track_caller]
    pub fn has_number_of_creations(self, expected: usize) -> Self {
        self.has_number_of(ChangeType::Creation, expected)
    }

    #[track_caller]
    pub fn has_number_of_modifications(self, expected: usize) -> Self {
        self.has_number_of(ChangeType::Modification, expected)
    }

    #[track_caller]
    pub fn has_number_of_deletions(self, expected: usize) -> Self {
        self.has_number_of(ChangeType::Deletion, expected)
    }

    #[track_caller]
    fn has_number_of(self, change_type: ChangeType, expected: usize) -> Self {
        let actual = self.changes.count_of(change_type);
        assert!(
            actual == expected,
            "expected {} {} change(s) but found {}",
            expected,
            change_type,
            actual
        );
        self
    }

    /// Continue with the `index`-th change.
    ///
    /// # Panics
    ///
    /// Panics when there is no such change.
    #[track_caller]
    pub fn change(self, index: usize) -> ChangeAssert<'a> {
        let change = self.changes.as_slice().get(index).unwrap_or_else(|| {
            panic!(
                "expected a change at index {} but there are only {}",
                index,
                self.changes.len()
            )
        });
        ChangeAssert {
            change,
            settings: *self.changes.settings(),
        }
    }
}

pub struct ChangeAssert<'a> {
    change: &'a Change,
    settings: LetterCaseSettings,
}

impl<'a> ChangeAssert<'a> {
    #[track_caller]
    pub fn is_creation(self) -> Self {
        self.is_of_type(ChangeType::Creation)
    }

    #[track_caller]
    pub fn is_modification(self) -> Self {
        self.is_of_type(ChangeType::Modification)
    }

    #[track_caller]
    pub fn is_deletion(self) -> Self {
        self.is_of_type(ChangeType::Deletion)
    }

    #[track_caller]
    fn is_of_type(self, expected: ChangeType) -> Self {
        let actual = self.change.change_type();
        assert!(
            actual == expected,
            "expected a {} but the change on {} is a {}",
            expected,
            self.change.data_name(),
            actual
        );
        self
    }

    /// The primary-key tuple equals `expected`, value by value.
    #[track_caller]
    pub fn has_pks<I, V>(self, expected: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let expected: Vec<Value> = expected.into_iter().map(Into::into).collect();
        let actual = self.change.pk_values();
        let same = actual.len() == expected.len()
            && actual.iter().zip(&expected).all(|(a, e)| a.same_as(e));
        assert!(
            same,
            "expected primary key {} but found {}",
            render(&expected),
            render(actual)
        );
        self
    }

    /// The modified columns are exactly `expected`, in order, names matched
    /// through the column letter case.
    #[track_caller]
    pub fn has_modified_columns(self, expected: &[&str]) -> Self {
        let actual = self.change.modified_columns();
        let column_case = self.settings.column();
        let same = actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected)
                .all(|(a, e)| column_case.eq_str(a, e));
        assert!(
            same,
            "expected modified columns {:?} but found {:?}",
            expected,
            actual
        );
        self
    }

    /// The change was observed on `table`, matched through the table
    /// letter case.
    #[track_caller]
    pub fn is_on_table(self, table: &str) -> Self {
        let name = self.change.data_name();
        assert!(
            self.settings.table().eq_str(name, table),
            "expected a change on table {} but found one on {}",
            table,
            name
        );
        self
    }
}

fn render(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", parts.join(", "))
}
