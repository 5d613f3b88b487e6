//! Start-point / end-point change recording.
//!
//! A [`ChangesRecorder`] names what to watch, captures it once at a start
//! point and once at an end point, and diffs the two captures:
//!
//! ```
//! use rowdelta_core::LetterCaseSettings;
//! use rowdelta_store::{db, ChangesRecorder};
//!
//! let conn = db::open_in_memory().unwrap();
//! conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);").unwrap();
//!
//! let mut recorder = ChangesRecorder::new(LetterCaseSettings::default()).on_tables(["users"]);
//! recorder.set_start_point(&conn).unwrap();
//! conn.execute("INSERT INTO users VALUES (1, 'Ada')", []).unwrap();
//! recorder.set_end_point(&conn).unwrap();
//!
//! let changes = recorder.changes().unwrap();
//! assert_eq!(changes.creations().len(), 1);
//! ```

#![allow(clippy::result_large_err)]

use rowdelta_core::diff::{compute_changes, Changes};
use rowdelta_core::model::Snapshot;
use rowdelta_core::{log_op_end, log_op_error, log_op_start, LetterCaseSettings};
use rowdelta_core_types::RequestId;
use rusqlite::Connection;
use std::time::Instant;

use crate::errors::{recorder_state, Result};
use crate::source::{capture_request, capture_table, list_tables, resolve_table_name};

#[derive(Debug, Clone)]
enum Target {
    Tables(Vec<String>),
    AllTables,
    Request {
        sql: String,
        primary_key: Vec<String>,
    },
}

/// Snapshots taken at one point, in target order.
#[derive(Debug, Clone)]
struct Capture {
    tables: Vec<Snapshot>,
    requests: Vec<Snapshot>,
}

/// Records changes between a start point and an end point.
///
/// Table changes come first, grouped per table in table-name order (names
/// compared with the table letter case), followed by request changes in the
/// order the requests were registered.
#[derive(Debug, Clone)]
pub struct ChangesRecorder {
    settings: LetterCaseSettings,
    request_id: RequestId,
    targets: Vec<Target>,
    tables: Vec<String>,
    start: Option<Capture>,
    end: Option<Capture>,
}

impl ChangesRecorder {
    pub fn new(settings: LetterCaseSettings) -> Self {
        Self {
            settings,
            request_id: RequestId::new(),
            targets: Vec::new(),
            tables: Vec::new(),
            start: None,
            end: None,
        }
    }

    /// Watch the named tables
    pub fn on_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets
            .push(Target::Tables(tables.into_iter().map(Into::into).collect()));
        self
    }

    /// Watch every table that exists at the start point
    pub fn on_all_tables(mut self) -> Self {
        self.targets.push(Target::AllTables);
        self
    }

    /// Watch the result of a query, keyed on `primary_key` (may be empty)
    pub fn on_request<I, S>(mut self, sql: impl Into<String>, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.push(Target::Request {
            sql: sql.into(),
            primary_key: primary_key.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Correlation id shared by every log event of this recording
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Tables being watched, resolved at the start point
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Capture the watched data as the start point.
    ///
    /// Setting a new start point discards any previous end point.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` - a named table does not exist
    /// - `Persistence` - SQLite failed while reading
    pub fn set_start_point(&mut self, conn: &Connection) -> Result<()> {
        log_op_start!("set_start_point", request_id = %self.request_id);
        let start = Instant::now();

        // nothing is committed unless both resolution and capture succeed
        let captured = self
            .resolve_tables(conn)
            .and_then(|tables| Ok((self.capture(conn, &tables)?, tables)))
            .map_err(|e| {
                log_op_error!(
                    "set_start_point",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %self.request_id
                );
                e.with_request_id(self.request_id.clone())
            })?;
        let (capture, tables) = captured;
        self.tables = tables;
        self.start = Some(capture);
        self.end = None;

        log_op_end!(
            "set_start_point",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.request_id,
            table_count = self.tables.len() as u64
        );
        Ok(())
    }

    /// Capture the watched data as the end point.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - no start point has been set
    /// - `TableNotFound` - a watched table was dropped since the start point
    /// - `Persistence` - SQLite failed while reading
    pub fn set_end_point(&mut self, conn: &Connection) -> Result<()> {
        log_op_start!("set_end_point", request_id = %self.request_id);
        let start = Instant::now();

        let captured = match self.start {
            None => Err(recorder_state(
                "set_end_point",
                "the start point must be set before the end point",
            )),
            Some(_) => self.capture(conn, &self.tables),
        };
        let captured = captured.map_err(|e| {
            log_op_error!(
                "set_end_point",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %self.request_id
            );
            e.with_request_id(self.request_id.clone())
        })?;
        self.end = Some(captured);

        log_op_end!(
            "set_end_point",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.request_id
        );
        Ok(())
    }

    /// Changes between the start point and the end point.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - the start or end point is not set
    /// - `PrimaryKeyMismatch` - a table's primary key changed between points
    pub fn changes(&self) -> Result<Changes> {
        let (Some(before), Some(after)) = (&self.start, &self.end) else {
            return Err(recorder_state(
                "changes",
                "both the start point and the end point must be set",
            )
            .with_request_id(self.request_id.clone()));
        };

        let mut parts = Vec::with_capacity(before.tables.len() + before.requests.len());
        for b in &before.tables {
            let a = self.end_snapshot_of(after, b.name())?;
            parts.push(compute_changes(b, a).map_err(|e| e.with_request_id(self.request_id.clone()))?);
        }
        if before.requests.len() != after.requests.len() {
            return Err(recorder_state(
                "changes",
                "the start and end points captured different requests",
            )
            .with_request_id(self.request_id.clone()));
        }
        for (b, a) in before.requests.iter().zip(&after.requests) {
            parts.push(compute_changes(b, a).map_err(|e| e.with_request_id(self.request_id.clone()))?);
        }
        Ok(Changes::concat(parts, self.settings))
    }

    fn end_snapshot_of<'c>(&self, after: &'c Capture, table: &str) -> Result<&'c Snapshot> {
        let table_case = self.settings.table();
        after
            .tables
            .iter()
            .find(|s| table_case.eq_str(s.name(), table))
            .ok_or_else(|| {
                recorder_state("changes", "the end point did not capture every start table")
                    .with_entity_id(table)
                    .with_request_id(self.request_id.clone())
            })
    }

    fn resolve_tables(&self, conn: &Connection) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        for target in &self.targets {
            match target {
                Target::Tables(names) => {
                    for name in names {
                        tables.push(resolve_table_name(conn, name, &self.settings)?);
                    }
                }
                Target::AllTables => tables.extend(list_tables(conn)?),
                Target::Request { .. } => {}
            }
        }
        let table_case = self.settings.table();
        tables.sort_by(|a, b| table_case.compare(Some(a.as_str()), Some(b.as_str())));
        tables.dedup_by(|a, b| table_case.eq_str(a, b));
        Ok(tables)
    }

    fn capture(&self, conn: &Connection, tables: &[String]) -> Result<Capture> {
        let no_key: &[&str] = &[];
        let tables = tables
            .iter()
            .map(|t| capture_table(conn, t, &self.settings, no_key))
            .collect::<Result<Vec<_>>>()?;
        let requests = self
            .targets
            .iter()
            .filter_map(|target| match target {
                Target::Request { sql, primary_key } => {
                    Some(capture_request(conn, sql, &self.settings, primary_key.as_slice()))
                }
                _ => None,
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Capture { tables, requests })
    }
}
