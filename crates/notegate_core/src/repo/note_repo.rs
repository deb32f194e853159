//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete over the `notes` table.
//! - Publish the full ordered collection to observers after every mutation.
//!
//! # Invariants
//! - Lists are ordered by `created_at DESC, id DESC`.
//! - Observers receive one snapshot on registration and one per successful
//!   mutation; failed writes publish nothing.
//! - The repository never inspects note bodies; gating is the service's job.

use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId};
use crate::repo::observers::{NoteObservers, NotesListener, ObserverId};
use log::error;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT id, title, body, created_at FROM notes";
const NOTE_COLUMNS: [&str; 4] = ["id", "title", "body", "created_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is not migrated: missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "connection is not migrated: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for notes.
///
/// Implementations are swappable; the host picks one at startup and hands
/// it to [`crate::NoteService::new`].
pub trait NoteRepository {
    /// Inserts a note and returns its storage-assigned id.
    fn create_note(&self, note: &NewNote) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all notes, newest first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Hard-deletes one note. Unknown ids return `RepoError::NotFound`.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Registers a listener and immediately delivers the current collection.
    fn observe_notes(&self, listener: NotesListener) -> RepoResult<ObserverId>;
    /// Unregisters a listener. Returns `false` when `id` is unknown.
    fn unobserve(&self, id: ObserverId) -> bool;
}

/// SQLite-backed notes repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
    observers: NoteObservers,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   absent, e.g. a raw connection that skipped [`crate::db::open_db`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            observers: NoteObservers::new(),
        })
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn publish(&self) {
        if self.observers.is_empty() {
            return;
        }
        // The write already committed; a failed re-read is logged, not returned.
        match self.list_notes() {
            Ok(notes) => self.observers.notify_all(&notes),
            Err(err) => error!(
                "event=notes_publish module=repo status=error error_code=snapshot_failed error={err}"
            ),
        }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &NewNote) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (title, body, created_at) VALUES (?1, ?2, ?3);",
            params![note.title, note.body, note.created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        self.publish();
        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(note_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        self.publish();
        Ok(())
    }

    fn observe_notes(&self, listener: NotesListener) -> RepoResult<ObserverId> {
        let snapshot = self.list_notes()?;
        let id = self.observers.register(listener);
        self.observers.notify_one(id, &snapshot);
        Ok(id)
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
