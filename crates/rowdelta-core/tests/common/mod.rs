use rowdelta_core::model::{DataKind, Snapshot, Value, ValueType};
use rowdelta_core::LetterCaseSettings;

/// Build a `users(id INTEGER PRIMARY KEY, name TEXT)` table snapshot
#[allow(dead_code)]
pub fn users(rows: &[(i64, &str)]) -> Snapshot {
    users_with(LetterCaseSettings::default(), rows)
}

/// Same as [`users`] with explicit letter-case settings
#[allow(dead_code)]
pub fn users_with(settings: LetterCaseSettings, rows: &[(i64, &str)]) -> Snapshot {
    Snapshot::builder(DataKind::Table, "users")
        .settings(settings)
        .column("id", ValueType::Integer)
        .column("name", ValueType::Text)
        .primary_key(["id"])
        .rows(rows.iter().map(|(id, name)| vec![Value::from(*id), Value::from(*name)]))
        .build()
        .unwrap()
}

/// Build a table snapshot from column names, key columns and raw rows.
///
/// Every column is declared with an unknown type.
#[allow(dead_code)]
pub fn table(name: &str, columns: &[&str], pk: &[&str], rows: Vec<Vec<Value>>) -> Snapshot {
    let mut builder = Snapshot::builder(DataKind::Table, name);
    for column in columns {
        builder = builder.column(*column, ValueType::Unknown);
    }
    builder.primary_key(pk.iter().copied()).rows(rows).build().unwrap()
}

/// Build a keyless query snapshot
#[allow(dead_code)]
pub fn request(sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Snapshot {
    let mut builder = Snapshot::builder(DataKind::Request, sql);
    for column in columns {
        builder = builder.column(*column, ValueType::Unknown);
    }
    builder.rows(rows).build().unwrap()
}
