//! Database connection management
//!
//! Provides utilities for opening SQLite connections

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open (creating if needed) a SQLite database at the given path
///
/// # Errors
///
/// - `Persistence` - SQLite could not open the file
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an existing SQLite database without write access
///
/// Captures only ever read, and a missing file is an error rather than a
/// fresh empty database.
///
/// # Errors
///
/// - `Persistence` - the file does not exist or is not a database
pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path.as_ref(), flags).map_err(|e| {
        from_rusqlite(e).with_entity_id(path.as_ref().display().to_string())
    })
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// - `Persistence` - SQLite could not allocate the database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}
