//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a notes database file and applies pending migrations.
///
/// Emits `db_open` log events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory notes database with the full schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = connect()
        .map_err(|source| DbError::Open { mode, source })
        .and_then(|mut conn| bootstrap_connection(mode, &mut conn).map(|()| conn));
    let conn = opened.map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
            started_at.elapsed().as_millis(),
            err.code()
        );
        err
    })?;

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(mode: &'static str, conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .and_then(|()| conn.busy_timeout(BUSY_TIMEOUT))
        .map_err(|source| DbError::Open { mode, source })?;
    apply_migrations(conn)
}
