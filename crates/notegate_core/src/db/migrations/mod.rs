//! Embedded schema migrations for the notes store.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Pending migrations run in one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_notes_created_at_index.sql"),
    },
];

/// Returns the latest schema version this binary can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connection's schema up to [`latest_version`].
///
/// # Errors
/// - `DbError::NewerSchema` when the file was written by a newer build.
/// - `DbError::Migration` when a migration statement fails; nothing is applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::NewerSchema {
            found: current,
            supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let step = format!("{}\nPRAGMA user_version = {};", migration.sql, migration.version);
        tx.execute_batch(&step).map_err(|source| DbError::Migration {
            version: migration.version,
            source,
        })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
