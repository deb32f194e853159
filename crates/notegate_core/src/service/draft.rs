//! Editable create-note form state.
//!
//! # Responsibility
//! - Re-validate title and body on every edit and expose inline errors.
//! - Decide whether the save action is enabled.
//!
//! # Invariants
//! - `body_error` mirrors the body gate's `error` verbatim.
//! - `save` never reaches the service while `can_save()` is false.
//! - `is_saving` is true only while the service call is in flight; saving is
//!   synchronous, so callers observe it from other threads or not at all.

use crate::html::gate::validate;
use crate::model::note::{validate_title, Note};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::text::{is_blank, trim_form_start};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Draft save failure.
#[derive(Debug)]
pub enum DraftError {
    /// Save was requested while the form has errors or blank fields.
    NotReady,
    Service(NoteServiceError),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "note draft is not ready to save"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotReady => None,
            Self::Service(err) => Some(err),
        }
    }
}

impl From<NoteServiceError> for DraftError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

/// Form state for composing a new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    /// Unix epoch milliseconds assigned to the note on save.
    pub created_at: i64,
    pub title_error: Option<String>,
    pub body_error: Option<String>,
    pub is_html_valid: bool,
    pub is_saving: bool,
    /// Set once a save has persisted the note.
    pub save_success: bool,
}

impl NoteDraft {
    /// Empty draft dated `created_at`.
    pub fn new(created_at: i64) -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            created_at,
            title_error: None,
            body_error: None,
            is_html_valid: true,
            is_saving: false,
            save_success: false,
        }
    }

    /// Stores the title without leading whitespace and re-checks it.
    pub fn set_title(&mut self, value: &str) {
        self.title = trim_form_start(value).to_string();
        self.title_error = validate_title(&self.title)
            .err()
            .map(|reason| reason.to_string());
    }

    /// Stores the raw body and runs the body gate.
    pub fn set_body(&mut self, value: &str) {
        let result = validate(value);
        self.body = value.to_string();
        self.body_error = result.error;
        self.is_html_valid = result.is_valid;
    }

    pub fn set_created_at(&mut self, epoch_ms: i64) {
        self.created_at = epoch_ms;
    }

    /// Whether the save action should be enabled.
    pub fn can_save(&self) -> bool {
        !is_blank(&self.title)
            && !is_blank(&self.body)
            && self.is_html_valid
            && self.title_error.is_none()
            && self.body_error.is_none()
    }

    /// Persists the draft through `service`.
    ///
    /// # Errors
    /// - `DraftError::NotReady` when `can_save()` is false; nothing is written.
    /// - `DraftError::Service` when the service rejects or fails the write;
    ///   `save_success` stays false.
    pub fn save<R: NoteRepository>(
        &mut self,
        service: &NoteService<R>,
    ) -> Result<Note, DraftError> {
        if !self.can_save() {
            return Err(DraftError::NotReady);
        }
        self.is_saving = true;
        let outcome = service.create_note(&self.title, &self.body, self.created_at);
        self.is_saving = false;
        let note = outcome?;
        self.save_success = true;
        Ok(note)
    }
}
