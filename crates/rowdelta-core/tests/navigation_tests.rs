#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Navigating from changes and snapshots down to values.

mod common;

use common::users;
use rowdelta_core::diff::{compute_changes, ChangeType};
use rowdelta_core::errors::ExErrorKind;
use rowdelta_core::model::Value;
use rowdelta_core::navigation::assertions::{assert_that, assert_that_change};
use rowdelta_core::navigation::{ToChange, ToColumn, ToRow, ToValue};

// S1: change -> row -> value
#[test]
fn test_navigate_change_to_value() {
    let changes = compute_changes(&users(&[(1, "A")]), &users(&[(1, "B"), (2, "C")])).unwrap();

    assert_eq!(changes.change_count(), 2);
    let modification = changes.change_of_type(ChangeType::Modification, 0).unwrap();
    let end = modification.row(1).unwrap();
    assert_eq!(end.nth_value(1).unwrap(), &Value::from("B"));
    assert_eq!(end.value_count(), 2);

    let creation = changes.change_on_pk(&[Value::Integer(2)]).unwrap();
    assert_that_change(creation).is_creation().has_pks([2]);
    assert_eq!(creation.row(0).unwrap().value("NAME").unwrap(), &Value::from("C"));
}

// S2: out-of-range navigation is an error, not a panic
#[test]
fn test_navigation_out_of_range() {
    let snapshot = users(&[(1, "A")]);
    let changes = compute_changes(&snapshot, &snapshot).unwrap();

    assert_eq!(changes.change(0).unwrap_err().kind(), ExErrorKind::IndexOutOfBounds);
    assert_eq!(
        changes
            .change_of_type(ChangeType::Deletion, 0)
            .unwrap_err()
            .kind(),
        ExErrorKind::IndexOutOfBounds
    );
    assert_eq!(snapshot.row(1).unwrap_err().kind(), ExErrorKind::IndexOutOfBounds);
    let row = snapshot.row(0).unwrap();
    assert_eq!(row.nth_value(2).unwrap_err().kind(), ExErrorKind::IndexOutOfBounds);
    assert_eq!(row.value("age").unwrap_err().kind(), ExErrorKind::ColumnNotFound);
}

// S3: columns slice every row
#[test]
fn test_snapshot_columns() {
    let snapshot = users(&[(1, "A"), (2, "B")]);
    assert_eq!(snapshot.column_count(), 2);

    let names = snapshot.column_named("name").unwrap();
    assert_eq!(names.name(), "NAME");
    assert_eq!(names.values(), &[Value::from("A"), Value::from("B")]);

    let ids = snapshot.column(0).unwrap();
    assert_eq!(ids.nth_value(1).unwrap(), &Value::Integer(2));
}

// S4: chained assertions over one change list
#[test]
fn test_fluent_assertions() {
    let before = users(&[(1, "A"), (2, "B"), (3, "C")]);
    let after = users(&[(1, "A"), (2, "b"), (4, "D")]);
    let changes = compute_changes(&before, &after).unwrap();

    assert_that(&changes)
        .has_number_of_changes(3)
        .has_number_of_modifications(1)
        .has_number_of_deletions(1)
        .has_number_of_creations(1)
        .change(0)
        .is_modification()
        .is_on_table("USERS")
        .has_pks([2])
        .has_modified_columns(&["name"]);
    assert_that(&changes).change(1).is_deletion().has_pks([3]);
    assert_that(&changes).change(2).is_creation().has_pks([4]);
}

#[test]
#[should_panic(expected = "expected modified columns")]
fn test_modified_columns_mismatch_panics() {
    let changes = compute_changes(&users(&[(1, "A")]), &users(&[(1, "B")])).unwrap();
    assert_that(&changes).change(0).has_modified_columns(&["id"]);
}

#[test]
#[should_panic(expected = "expected a change at index 5")]
fn test_missing_change_panics() {
    let changes = compute_changes(&users(&[]), &users(&[(1, "A")])).unwrap();
    assert_that(&changes).change(5);
}
