//! Note use-case service.
//!
//! # Responsibility
//! - Gate titles and HTML bodies before anything reaches storage.
//! - Delegate create/list/delete/observe to an injected repository.
//!
//! # Invariants
//! - A rejected title or body never triggers a repository write.
//! - Persisted titles and bodies are trimmed.
//! - Title is checked before body; the first rejection is reported.

use crate::html::gate::{check_body, BodyRejection};
use crate::model::note::{validate_title, NewNote, Note, NoteId, TitleRejection};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use crate::repo::observers::ObserverId;
use crate::text::trim_form;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    InvalidTitle(TitleRejection),
    InvalidBody(BodyRejection),
    NoteNotFound(NoteId),
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(reason) => write!(f, "{reason}"),
            Self::InvalidBody(reason) => write!(f, "{reason}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(reason) => Some(reason),
            Self::InvalidBody(reason) => Some(reason),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<TitleRejection> for NoteServiceError {
    fn from(value: TitleRejection) -> Self {
        Self::InvalidTitle(value)
    }
}

impl From<BodyRejection> for NoteServiceError {
    fn from(value: BodyRejection) -> Self {
        Self::InvalidBody(value)
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists one note, returning the stored record.
    ///
    /// # Errors
    /// - `InvalidTitle` / `InvalidBody` with the user-facing reason.
    /// - `Repo` on storage failure.
    pub fn create_note(
        &self,
        title: &str,
        body: &str,
        created_at: i64,
    ) -> Result<Note, NoteServiceError> {
        if let Err(reason) = validate_title(title) {
            debug!("event=note_create module=service status=rejected field=title");
            return Err(reason.into());
        }
        if let Err(reason) = check_body(body) {
            debug!(
                "event=note_create module=service status=rejected field=body reason={}",
                reason.code()
            );
            return Err(reason.into());
        }

        let new_note = NewNote::new(trim_form(title), trim_form(body), created_at);
        let id = self.repo.create_note(&new_note)?;
        info!("event=note_create module=service status=ok note_id={id}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Deletes one note by id.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists all notes, newest first.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.list_notes()
    }

    /// Subscribes to the live note collection.
    ///
    /// `listener` runs once immediately and again after every mutation until
    /// [`NoteService::unobserve`] is called with the returned id.
    pub fn observe_notes(
        &self,
        listener: impl Fn(&[Note]) + Send + Sync + 'static,
    ) -> RepoResult<ObserverId> {
        self.repo.observe_notes(Arc::new(listener))
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        self.repo.unobserve(id)
    }
}
