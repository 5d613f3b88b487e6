//! Snapshot capture from SQLite.
//!
//! Reads a table or the result of a query into an immutable
//! [`Snapshot`]. Table and column names are matched with the
//! [`LetterCaseSettings`] in effect, so `users`, `Users` and `USERS` all
//! find the same table under the default settings.

#![allow(clippy::result_large_err)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rowdelta_core::errors::{ExError, RowDeltaError};
use rowdelta_core::model::{ColumnDescriptor, DataKind, Snapshot, Value, ValueType};
use rowdelta_core::{log_op_end, log_op_error, log_op_start, LetterCaseSettings};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Statement};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Instant;

use crate::errors::{from_rusqlite, table_not_found, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Names of all user tables and views, sorted by name.
///
/// # Errors
///
/// - `Persistence` - reading `sqlite_master` failed
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .map_err(from_rusqlite)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(names)
}

/// Find the stored name of a table, matched through the table letter case.
///
/// # Errors
///
/// - `TableNotFound` - no table or view matches `table`
/// - `Persistence` - reading `sqlite_master` failed
pub fn resolve_table_name(
    conn: &Connection,
    table: &str,
    settings: &LetterCaseSettings,
) -> Result<String> {
    let tables = list_tables(conn)?;
    // an exact match wins over a case-folded one
    if let Some(exact) = tables.iter().find(|t| t.as_str() == table) {
        return Ok(exact.clone());
    }
    settings
        .table()
        .position_in(&tables, table)
        .map(|i| tables[i].clone())
        .ok_or_else(|| table_not_found(table))
}

/// Capture every row of a table.
///
/// An empty `primary_key` uses the key declared in the schema (possibly
/// none); a non-empty one overrides it. Rows are read in primary-key order
/// when there is a key.
///
/// # Errors
///
/// - `TableNotFound` - no table or view matches `table`
/// - `ColumnNotFound` - a primary-key column does not exist
/// - `Persistence` - SQLite failed while reading
pub fn capture_table<S: AsRef<str>>(
    conn: &Connection,
    table: &str,
    settings: &LetterCaseSettings,
    primary_key: &[S],
) -> Result<Snapshot> {
    log_op_start!("capture_table", data_name = table);
    let start = Instant::now();

    let snapshot = capture_table_impl(conn, table, settings, primary_key).map_err(|e| {
        log_op_error!(
            "capture_table",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "capture_table",
        duration_ms = start.elapsed().as_millis() as u64,
        data_name = snapshot.name(),
        row_count = snapshot.row_count() as u64
    );
    Ok(snapshot)
}

/// Capture the result of a query.
///
/// Query snapshots are keyless unless `primary_key` names key columns.
///
/// # Errors
///
/// - `ColumnNotFound` - a primary-key column is not in the result
/// - `Persistence` - the query failed to prepare or run
pub fn capture_request<S: AsRef<str>>(
    conn: &Connection,
    sql: &str,
    settings: &LetterCaseSettings,
    primary_key: &[S],
) -> Result<Snapshot> {
    log_op_start!("capture_request", data_name = sql);
    let start = Instant::now();

    let snapshot = capture_request_impl(conn, sql, settings, primary_key).map_err(|e| {
        log_op_error!(
            "capture_request",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "capture_request",
        duration_ms = start.elapsed().as_millis() as u64,
        row_count = snapshot.row_count() as u64
    );
    Ok(snapshot)
}

struct TableColumn {
    descriptor: ColumnDescriptor,
    pk_position: i64,
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<TableColumn>> {
    let mut stmt = conn
        .prepare(r#"SELECT name, type, "notnull", pk FROM pragma_table_info(?1) ORDER BY cid"#)
        .map_err(from_rusqlite)?;
    let columns = stmt
        .query_map([table], |row| {
            let name: String = row.get(0)?;
            let declared: Option<String> = row.get(1)?;
            let not_null: bool = row.get(2)?;
            let pk_position: i64 = row.get(3)?;
            let mut descriptor =
                ColumnDescriptor::new(name, ValueType::from_declared(declared.as_deref().unwrap_or("")));
            if not_null {
                descriptor = descriptor.not_null();
            }
            Ok(TableColumn {
                descriptor,
                pk_position,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(columns)
}

fn capture_table_impl<S: AsRef<str>>(
    conn: &Connection,
    table: &str,
    settings: &LetterCaseSettings,
    primary_key: &[S],
) -> Result<Snapshot> {
    let table = resolve_table_name(conn, table, settings)?;
    let columns = table_columns(conn, &table)?;

    let primary_key: Vec<String> = if primary_key.is_empty() {
        let mut declared: Vec<&TableColumn> =
            columns.iter().filter(|c| c.pk_position > 0).collect();
        declared.sort_by_key(|c| c.pk_position);
        declared.iter().map(|c| c.descriptor.name.clone()).collect()
    } else {
        primary_key
            .iter()
            .map(|pk| stored_column_name(&table, &columns, settings, pk.as_ref()))
            .collect::<Result<_>>()?
    };

    let mut sql = format!("SELECT * FROM {}", quote_identifier(&table));
    if !primary_key.is_empty() {
        let order: Vec<String> = primary_key.iter().map(|c| quote_identifier(c)).collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
    }

    let descriptors: Vec<ColumnDescriptor> = columns.into_iter().map(|c| c.descriptor).collect();
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = read_rows(&mut stmt, &descriptors)?;

    Snapshot::builder(DataKind::Table, table)
        .settings(*settings)
        .columns(descriptors)
        .primary_key(primary_key)
        .rows(rows)
        .build()
}

fn capture_request_impl<S: AsRef<str>>(
    conn: &Connection,
    sql: &str,
    settings: &LetterCaseSettings,
    primary_key: &[S],
) -> Result<Snapshot> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let descriptors: Vec<ColumnDescriptor> = stmt
        .columns()
        .iter()
        .map(|c| {
            ColumnDescriptor::new(c.name(), ValueType::from_declared(c.decl_type().unwrap_or("")))
        })
        .collect();
    let rows = read_rows(&mut stmt, &descriptors)?;

    Snapshot::builder(DataKind::Request, sql)
        .settings(*settings)
        .columns(descriptors)
        .primary_key(primary_key.iter().map(|pk| pk.as_ref().to_string()))
        .rows(rows)
        .build()
}

// Map a user-supplied key column onto the name stored in the schema, the
// same way the snapshot builder matches key names against column names.
fn stored_column_name(
    table: &str,
    columns: &[TableColumn],
    settings: &LetterCaseSettings,
    wanted: &str,
) -> Result<String> {
    let wanted_converted = settings.primary_key().convert_str(wanted);
    columns
        .iter()
        .find(|c| {
            let stored = settings.column().convert_str(&c.descriptor.name);
            settings.column().eq_str(&stored, &wanted_converted)
        })
        .map(|c| c.descriptor.name.clone())
        .ok_or_else(|| {
            ExError::from(RowDeltaError::UnknownPrimaryKeyColumn {
                data_name: table.to_string(),
                column: wanted.to_string(),
            })
            .with_op("capture_table")
        })
}

fn read_rows(stmt: &mut Statement<'_>, descriptors: &[ColumnDescriptor]) -> Result<Vec<Vec<Value>>> {
    let mut rows = stmt.query([]).map_err(from_rusqlite)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        let values = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| row.get_ref(i).map(|v| decode_value(v, d.value_type)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        out.push(values);
    }
    Ok(out)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Decode one SQLite value, using the declared column type to recover
/// booleans, decimals and temporal values from SQLite's storage classes.
///
/// Text that does not parse as the declared type is kept as `Text`.
pub fn decode_value(value: ValueRef<'_>, declared: ValueType) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => match declared {
            ValueType::Boolean => Value::Boolean(i != 0),
            ValueType::Decimal => Value::Decimal(Decimal::from(i)),
            ValueType::Float => Value::Float(i as f64),
            _ => Value::Integer(i),
        },
        ValueRef::Real(f) => match declared {
            // keep the float unless the decimal reads back as the same number
            ValueType::Decimal => Decimal::from_f64(f)
                .filter(|d| d.to_f64() == Some(f))
                .map_or(Value::Float(f), Value::Decimal),
            _ => Value::Float(f),
        },
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => decode_text(text, declared),
            Err(_) => Value::Bytes(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

fn decode_text(text: &str, declared: ValueType) -> Value {
    let parsed = match declared {
        ValueType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        ValueType::Time => TIME_FORMATS
            .iter()
            .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
            .map(Value::Time),
        ValueType::DateTime => DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
            .map(Value::DateTime),
        ValueType::Decimal => Decimal::from_str(text).ok().map(Value::Decimal),
        ValueType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::Text(text.to_string()))
}
