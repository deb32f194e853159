//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose the body gate and note use-cases as flat, sync functions.
//! - Convert every core error into a message inside a response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - `validate_body` mirrors the core gate result verbatim.
//!
//! # Observing notes
//! Calls are stateless: each opens the store, runs one use-case and closes it,
//! so no core observer outlives a call. Hosts keep their list current by
//! calling `note_list` after every successful `note_create` or `note_delete`;
//! the response always carries the full collection, newest first.

use log::warn;
use notegate_core::db::open_db;
use notegate_core::{
    core_version as core_version_inner, format_epoch_millis, init_logging as init_logging_inner,
    ping as ping_inner, validate, Note, NoteService, NoteServiceError, SqliteNoteRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const NOTES_DB_FILE_NAME: &str = "notegate.sqlite3";
const NOTES_DB_PATH_ENV: &str = "NOTEGATE_DB_PATH";
static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Body gate outcome for inline form feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyValidation {
    pub is_valid: bool,
    /// Rejection message, present only when `is_valid` is false.
    pub error: Option<String>,
}

/// Note row shaped for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: i64,
    /// `d MMMM yyyy`, empty when the timestamp cannot be rendered.
    pub created_label: String,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    /// Notes newest first; empty on failure.
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id on success.
    pub note_id: Option<i64>,
    /// Human-readable message; on validation failure this is the exact
    /// rejection text suitable for inline display.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: i64) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Runs the body gate; safe to call on every keystroke.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_body(body: String) -> BodyValidation {
    let result = validate(body.as_str());
    BodyValidation {
        is_valid: result.is_valid,
        error: result.error,
    }
}

/// Validates and stores a note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(title: String, body: String, created_at: i64) -> NoteActionResponse {
    match with_note_service(|service| service.create_note(&title, &body, created_at)) {
        Ok(note) => NoteActionResponse::success("Note created.", note.id),
        Err(FfiError::Rejected(message)) => NoteActionResponse::failure(message),
        Err(FfiError::Failed(message)) => {
            NoteActionResponse::failure(format!("note_create failed: {message}"))
        }
    }
}

/// Lists all notes newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn note_list() -> NoteListResponse {
    match with_note_service(|service| service.list_notes().map_err(NoteServiceError::from)) {
        Ok(notes) => {
            let items = notes.into_iter().map(to_note_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NoteListResponse { items, message }
        }
        Err(err) => NoteListResponse {
            items: Vec::new(),
            message: format!("note_list failed: {}", err.message()),
        },
    }
}

/// Deletes a note by id.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: i64) -> NoteActionResponse {
    match with_note_service(|service| service.delete_note(id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", id),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {}", err.message())),
    }
}

/// Formats epoch milliseconds for display, empty when out of range.
#[flutter_rust_bridge::frb(sync)]
pub fn format_note_date(epoch_ms: i64) -> String {
    format_epoch_millis(epoch_ms).unwrap_or_default()
}

enum FfiError {
    /// User-correctable validation failure; message is shown verbatim.
    Rejected(String),
    Failed(String),
}

impl FfiError {
    fn message(&self) -> &str {
        match self {
            Self::Rejected(message) | Self::Failed(message) => message,
        }
    }
}

impl From<NoteServiceError> for FfiError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::InvalidTitle(_) | NoteServiceError::InvalidBody(_) => {
                Self::Rejected(value.to_string())
            }
            other => Self::Failed(other.to_string()),
        }
    }
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(NOTES_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}

fn with_note_service<T>(
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
) -> Result<T, FfiError> {
    let db_path = resolve_notes_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        FfiError::Failed(format!("notes DB open failed: {err}"))
    })?;
    let repo = SqliteNoteRepository::try_new(&conn)
        .map_err(|err| FfiError::Failed(format!("notes repo init failed: {err}")))?;
    let service = NoteService::new(repo);
    Ok(f(&service)?)
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        created_label: format_epoch_millis(note.created_at).unwrap_or_default(),
        id: note.id,
        title: note.title,
        body: note.body,
        created_at: note.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, format_note_date, init_logging, note_create, note_delete, note_list, ping,
        validate_body,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn validate_body_mirrors_core_messages() {
        let rejected = validate_body("<a>no href</a>".to_string());
        assert!(!rejected.is_valid);
        assert_eq!(
            rejected.error.as_deref(),
            Some("Anchor tags must include href")
        );

        let accepted = validate_body("<p>fine</p>".to_string());
        assert!(accepted.is_valid);
        assert!(accepted.error.is_none());
    }

    #[test]
    fn note_create_reports_rejection_text_verbatim() {
        let response = note_create("Title".to_string(), "<foo>".to_string(), 1);
        assert!(!response.ok);
        assert!(response.note_id.is_none());
        assert_eq!(response.message, "Disallowed tag: <foo>");
    }

    #[test]
    fn created_note_is_listed_then_deleted() {
        let title = unique_token("ffi-note");
        let created = note_create(title.clone(), "<p>body</p>".to_string(), 1_752_710_400_000);
        assert!(created.ok, "{}", created.message);
        let note_id = created.note_id.expect("created note should return id");

        let listed = note_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == note_id)
            .expect("created note should be listed");
        assert_eq!(item.title, title);
        assert_eq!(item.created_label, "17 July 2025");

        let deleted = note_delete(note_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!note_list().items.iter().any(|item| item.id == note_id));

        let again = note_delete(note_id);
        assert!(!again.ok);
        assert!(again.message.contains("not found"));
    }

    #[test]
    fn next_list_call_reflects_each_mutation() {
        let older = note_create(unique_token("poll-a"), "a".to_string(), 4_102_444_800_000);
        let newer = note_create(unique_token("poll-b"), "b".to_string(), 4_102_444_800_001);
        let (older_id, newer_id) = (older.note_id.unwrap(), newer.note_id.unwrap());

        let ids: Vec<i64> = note_list().items.iter().map(|item| item.id).collect();
        let position = |id| ids.iter().position(|listed| *listed == id).unwrap();
        assert!(position(newer_id) < position(older_id));

        assert!(note_delete(newer_id).ok);
        let ids: Vec<i64> = note_list().items.iter().map(|item| item.id).collect();
        assert!(ids.contains(&older_id));
        assert!(!ids.contains(&newer_id));
        assert!(note_delete(older_id).ok);
    }

    #[test]
    fn format_note_date_is_empty_when_out_of_range() {
        assert_eq!(format_note_date(0), "1 January 1970");
        assert_eq!(format_note_date(i64::MAX), "");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
