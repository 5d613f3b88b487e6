#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Change classification scenarios for the diff engine.

mod common;

use common::{request, table, users, users_with};
use rowdelta_core::diff::{compute_changes, diff, ChangeType};
use rowdelta_core::errors::ExErrorKind;
use rowdelta_core::letter_case::{CaseComparison, CaseConversion, LetterCase};
use rowdelta_core::model::{DataKind, Snapshot, Value, ValueType};
use rowdelta_core::navigation::assertions::assert_that;
use rowdelta_core::LetterCaseSettings;
use rust_decimal::Decimal;
use std::str::FromStr;

// S1: modification, deletion and creation in one diff
#[test]
fn test_classifies_and_orders_changes() {
    let before = users(&[(1, "A"), (2, "B")]);
    let after = users(&[(1, "A2"), (3, "C")]);

    let changes = compute_changes(&before, &after).unwrap();

    let kinds: Vec<ChangeType> = changes.iter().map(|c| c.change_type()).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeType::Modification,
            ChangeType::Deletion,
            ChangeType::Creation
        ]
    );
    assert_that(&changes)
        .change(0)
        .has_pks([1])
        .has_modified_columns(&["NAME"]);
    assert_that(&changes).change(1).has_pks([2]);
    assert_that(&changes).change(2).has_pks([3]);
}

// S2: a modification carries both rows
#[test]
fn test_modification_keeps_both_rows() {
    let before = users(&[(1, "A")]);
    let after = users(&[(1, "B")]);

    let changes = compute_changes(&before, &after).unwrap();
    let change = &changes.as_slice()[0];

    let start = change.row_at_start_point().unwrap();
    let end = change.row_at_end_point().unwrap();
    assert_eq!(start.value("name").unwrap(), &Value::from("A"));
    assert_eq!(end.value("name").unwrap(), &Value::from("B"));
    assert_eq!(change.data_kind(), DataKind::Table);
    assert_eq!(change.data_name(), "users");
    assert_eq!(change.pk_names(), ["ID".to_string()]);
}

// S3: creations have no start row and deletions no end row
#[test]
fn test_creation_and_deletion_rows() {
    let changes = compute_changes(&users(&[(1, "A")]), &users(&[(2, "B")])).unwrap();

    let deletion = &changes.as_slice()[0];
    assert!(deletion.is_deletion());
    assert!(deletion.row_at_end_point().is_none());
    assert!(deletion.modified_columns().is_empty());

    let creation = &changes.as_slice()[1];
    assert!(creation.is_creation());
    assert!(creation.row_at_start_point().is_none());
}

// S4: empty snapshots are valid
#[test]
fn test_empty_snapshots() {
    assert!(compute_changes(&users(&[]), &users(&[])).unwrap().is_empty());

    let created = compute_changes(&users(&[]), &users(&[(1, "A"), (2, "B")])).unwrap();
    assert_that(&created).has_number_of_creations(2).has_number_of_changes(2);

    let deleted = compute_changes(&users(&[(1, "A")]), &users(&[])).unwrap();
    assert_that(&deleted).has_number_of_deletions(1).has_number_of_changes(1);
}

// S5: column metadata differing only by case is the same column
#[test]
fn test_column_names_differing_in_case_match() {
    let before = table("t", &["id", "Name"], &["id"], vec![vec![1.into(), "x".into()]]);
    let after = table("t", &["ID", "NAME"], &["ID"], vec![vec![1.into(), "x".into()]]);

    assert!(compute_changes(&before, &after).unwrap().is_empty());
}

// S6: with strict policies, differently cased columns are different columns
#[test]
fn test_strict_column_policy_keeps_columns_apart() {
    let strict = LetterCase::get_letter_case(CaseConversion::None, CaseComparison::Strict);
    let settings = LetterCaseSettings::default()
        .with_column(strict)
        .with_primary_key(strict);
    let build = |name_column: &str, value: &str| {
        Snapshot::builder(DataKind::Table, "t")
            .settings(settings)
            .column("id", ValueType::Integer)
            .column(name_column, ValueType::Text)
            .primary_key(["id"])
            .row(vec![1.into(), value.into()])
            .build()
            .unwrap()
    };

    // no shared non-key column, so nothing can differ
    let changes = compute_changes(&build("Name", "x"), &build("NAME", "y")).unwrap();
    assert!(changes.is_empty());
}

// S7: only shared columns are compared
#[test]
fn test_schema_drift_compares_shared_columns() {
    let before = table(
        "t",
        &["id", "a", "dropped"],
        &["id"],
        vec![vec![1.into(), "same".into(), "x".into()]],
    );
    let after = table(
        "t",
        &["added", "a", "id"],
        &["id"],
        vec![vec!["y".into(), "same".into(), 1.into()]],
    );
    assert!(compute_changes(&before, &after).unwrap().is_empty());

    let after = table(
        "t",
        &["added", "a", "id"],
        &["id"],
        vec![vec!["y".into(), "other".into(), 1.into()]],
    );
    let changes = compute_changes(&before, &after).unwrap();
    assert_that(&changes)
        .has_number_of_modifications(1)
        .change(0)
        .has_modified_columns(&["a"]);
}

// S8: modified columns are listed in before-column order
#[test]
fn test_modified_columns_order() {
    let before = table(
        "t",
        &["id", "a", "b", "c"],
        &["id"],
        vec![vec![1.into(), 1.into(), 2.into(), 3.into()]],
    );
    let after = table(
        "t",
        &["c", "b", "a", "id"],
        &["id"],
        vec![vec![30.into(), 2.into(), 10.into(), 1.into()]],
    );
    let changes = compute_changes(&before, &after).unwrap();
    assert_eq!(
        changes.as_slice()[0].modified_columns(),
        ["A".to_string(), "C".to_string()]
    );
}

// S9: null key components equal null
#[test]
fn test_null_primary_key_matches_null() {
    let before = table("t", &["k", "v"], &["k"], vec![vec![Value::Null, 1.into()]]);
    let after = table("t", &["k", "v"], &["k"], vec![vec![Value::Null, 2.into()]]);

    let changes = compute_changes(&before, &after).unwrap();
    assert_that(&changes)
        .has_number_of_changes(1)
        .change(0)
        .is_modification()
        .has_pks([Value::Null]);
}

// S10: composite keys, with a null component
#[test]
fn test_composite_key_with_null_component() {
    let before = table(
        "t",
        &["a", "b", "v"],
        &["a", "b"],
        vec![
            vec![1.into(), Value::Null, "x".into()],
            vec![1.into(), 2.into(), "y".into()],
        ],
    );
    let after = table(
        "t",
        &["a", "b", "v"],
        &["a", "b"],
        vec![
            vec![1.into(), 2.into(), "y".into()],
            vec![1.into(), Value::Null, "x".into()],
        ],
    );
    assert!(compute_changes(&before, &after).unwrap().is_empty());
}

// S11: duplicate keys, last row wins on both sides
#[test]
fn test_duplicate_keys_last_row_wins() {
    let before = users(&[(1, "first"), (1, "second")]);
    let after = users(&[(1, "third")]);

    let changes = compute_changes(&before, &after).unwrap();
    assert_eq!(changes.len(), 1);
    let start = changes.as_slice()[0].row_at_start_point().unwrap();
    assert_eq!(start.value("name").unwrap(), &Value::from("second"));

    let after = users(&[(1, "x"), (1, "second")]);
    assert!(compute_changes(&before, &after).unwrap().is_empty());
}

// S12: mismatched primary keys are a usage error
#[test]
fn test_primary_key_mismatch() {
    let before = table("t", &["a", "b"], &["a"], vec![]);
    let after = table("t", &["a", "b"], &["b"], vec![]);
    let err = compute_changes(&before, &after).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::PrimaryKeyMismatch);
    assert_eq!(err.code(), "ERR_PRIMARY_KEY_MISMATCH");
    assert!(err.kind().is_usage_error());

    let longer = table("t", &["a", "b"], &["a", "b"], vec![]);
    let err = compute_changes(&before, &longer).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::PrimaryKeyMismatch);
}

// S13: primary key names are compared through the primary-key letter case
#[test]
fn test_primary_key_names_compared_ignoring_case() {
    let keep = LetterCase::get_letter_case(CaseConversion::None, CaseComparison::Ignore);
    let settings = LetterCaseSettings::default()
        .with_column(keep)
        .with_primary_key(keep);
    let build = |pk: &str| {
        Snapshot::builder(DataKind::Table, "t")
            .settings(settings)
            .column("Id", ValueType::Integer)
            .primary_key([pk])
            .build()
            .unwrap()
    };
    assert!(compute_changes(&build("id"), &build("ID")).is_ok());
}

// S14: numeric values compare by magnitude
#[test]
fn test_numeric_scale_is_not_a_change() {
    let before = table(
        "prices",
        &["id", "amount"],
        &["id"],
        vec![vec![1.into(), Decimal::from_str("10.50").unwrap().into()]],
    );
    let after = table(
        "prices",
        &["id", "amount"],
        &["id"],
        vec![vec![1.into(), Decimal::from_str("10.5").unwrap().into()]],
    );
    assert!(compute_changes(&before, &after).unwrap().is_empty());
}

// S15: text values are case sensitive
#[test]
fn test_text_values_are_case_sensitive() {
    let changes = compute_changes(&users(&[(1, "ada")]), &users(&[(1, "Ada")])).unwrap();
    assert_that(&changes).has_number_of_modifications(1);
}

// S16: explicit primary key overrides declared keys
#[test]
fn test_diff_with_explicit_primary_key() {
    let before = users(&[(1, "A"), (2, "B")]);
    let after = users(&[(10, "A"), (20, "B")]);

    let by_id = diff::<&str>(&before, &after, &[]).unwrap();
    assert_that(&by_id).has_number_of_deletions(2).has_number_of_creations(2);

    let by_name = diff(&before, &after, &["name"]).unwrap();
    assert_that(&by_name).has_number_of_modifications(2);
    assert_that(&by_name)
        .change(0)
        .has_pks(["A"])
        .has_modified_columns(&["id"]);
}

// S17: explicit primary key must exist
#[test]
fn test_diff_with_unknown_primary_key() {
    let err = diff(&users(&[]), &users(&[]), &["nope"]).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ColumnNotFound);
}

// S18: keyless data matches rows as a multiset
#[test]
fn test_keyless_multiset_matching() {
    let sql = "select name from users";
    let before = request(
        sql,
        &["name"],
        vec![vec!["a".into()], vec!["a".into()], vec!["b".into()]],
    );
    let after = request(
        sql,
        &["name"],
        vec![vec!["b".into()], vec!["a".into()], vec!["c".into()]],
    );

    let changes = compute_changes(&before, &after).unwrap();
    assert_that(&changes)
        .has_number_of_changes(2)
        .has_number_of_modifications(0);

    let deletion = &changes.as_slice()[0];
    assert!(deletion.is_deletion());
    assert_eq!(deletion.data_kind(), DataKind::Request);
    assert_eq!(deletion.row_at_start_point().unwrap().index(), 1);
    assert!(deletion.pk_values().is_empty());

    let creation = &changes.as_slice()[1];
    assert!(creation.is_creation());
    assert_eq!(creation.row_at_end_point().unwrap().value("name").unwrap(), &Value::from("c"));
}

// S19: per-table filtering uses the table letter case
#[test]
fn test_of_table_ignores_case() {
    let changes = compute_changes(&users(&[]), &users(&[(1, "A")])).unwrap();
    assert_eq!(changes.of_table("USERS").len(), 1);
    assert!(changes.of_table("accounts").is_empty());
}

// S20: JSON form of a change list
#[test]
fn test_changes_serialize_to_json() {
    let settings = LetterCaseSettings::default();
    let changes = compute_changes(
        &users_with(settings, &[(1, "A")]),
        &users_with(settings, &[(1, "B")]),
    )
    .unwrap();

    let json = serde_json::to_value(&changes).unwrap();
    let change = &json[0];
    assert_eq!(change["change_type"], "modification");
    assert_eq!(change["data_kind"], "table");
    assert_eq!(change["pk_values"][0]["value"], 1);
    assert_eq!(change["before"]["NAME"]["value"], "A");
    assert_eq!(change["after"]["NAME"]["value"], "B");
    assert_eq!(change["modified_columns"][0], "NAME");
}

// S21: floats one ulp apart are different values
#[test]
fn test_close_floats_are_a_modification() {
    let before = table(
        "readings",
        &["id", "value"],
        &["id"],
        vec![vec![1.into(), Value::Float(1.0)]],
    );
    let after = table(
        "readings",
        &["id", "value"],
        &["id"],
        vec![vec![1.into(), Value::Float(1.000_000_000_000_000_2)]],
    );
    let changes = compute_changes(&before, &after).unwrap();
    assert_that(&changes)
        .has_number_of_changes(1)
        .change(0)
        .is_modification()
        .has_modified_columns(&["VALUE"]);

    let tiny = table(
        "readings",
        &["id", "value"],
        &["id"],
        vec![vec![1.into(), Value::Float(1e-30)]],
    );
    let zero = table(
        "readings",
        &["id", "value"],
        &["id"],
        vec![vec![1.into(), Value::Integer(0)]],
    );
    assert_that(&compute_changes(&zero, &tiny).unwrap()).has_number_of_modifications(1);
}

// S22: distinct float keys stay distinct rows
#[test]
fn test_close_float_keys_are_distinct_rows() {
    let before = table(
        "readings",
        &["at", "value"],
        &["at"],
        vec![
            vec![Value::Float(0.3), "a".into()],
            vec![Value::Float(0.300_000_000_000_000_04), "b".into()],
        ],
    );
    let after = table("readings", &["at", "value"], &["at"], vec![]);
    let changes = compute_changes(&before, &after).unwrap();
    assert_that(&changes).has_number_of_deletions(2);
}
