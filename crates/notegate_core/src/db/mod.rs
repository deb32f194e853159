//! Notes store bootstrap.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations before any note is read or written.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A connection returned from this module is fully migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why a notes store could not be made ready.
#[derive(Debug)]
pub enum DbError {
    /// The file could not be opened or configured.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    NewerSchema { found: u32, supported: u32 },
    /// Migration `version` failed; the schema is left at its prior version.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::NewerSchema { .. } => "db_schema_newer",
            Self::Migration { .. } => "db_migration_failed",
            Self::Sqlite(_) => "db_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => write!(f, "cannot open {mode} notes store: {source}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "notes store schema v{found} is newer than this build (v{supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "notes store migration v{version} failed: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
