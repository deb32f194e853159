//! Core domain logic for notegate.
//! The HTML body gate, note storage and note use-cases live here; UI hosts
//! reach them through `notegate_ffi`.

pub mod db;
pub mod display;
pub mod html;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod text;

pub use display::format_epoch_millis;
pub use html::gate::{
    check_body, validate, BodyRejection, ValidationResult, ALLOWED_TAGS, MAX_BODY_CHARS,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{validate_title, NewNote, Note, NoteId, TitleRejection, MAX_TITLE_CHARS};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use repo::observers::{NotesListener, ObserverId};
pub use service::draft::{DraftError, NoteDraft};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::notes_list::{NotesListSnapshot, NotesListState};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
