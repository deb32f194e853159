//! Notes list screen state.
//!
//! # Responsibility
//! - Mirror the live note collection from [`NoteService::observe_notes`].
//! - Drive the delete confirmation flow.
//!
//! # Invariants
//! - `is_loading` is true only until the first snapshot or subscription error.
//! - Every confirmed delete ends with the dialog hidden and `is_deleting` false.
//! - The state lock is never held across a service call; snapshots arrive
//!   synchronously on the mutating thread.

use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::repo::observers::ObserverId;
use crate::service::note_service::NoteService;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Point-in-time view of the notes list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListSnapshot {
    pub notes: Vec<Note>,
    pub is_loading: bool,
    pub is_deleting: bool,
    /// Last subscription or delete failure, cleared by the next snapshot.
    pub error: Option<String>,
    pub show_delete_dialog: bool,
    pub note_to_delete: Option<Note>,
}

impl NotesListSnapshot {
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

impl Default for NotesListSnapshot {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            is_loading: true,
            is_deleting: false,
            error: None,
            show_delete_dialog: false,
            note_to_delete: None,
        }
    }
}

/// Notes list state bound to one service subscription.
pub struct NotesListState {
    shared: Arc<Mutex<NotesListSnapshot>>,
    observer: Option<ObserverId>,
}

impl NotesListState {
    /// Loading state with no subscription yet.
    pub fn new() -> Self {
        Self {
            shared: Arc::default(),
            observer: None,
        }
    }

    /// Subscribes to `service`. A failed subscription is reported through
    /// `error` rather than returned.
    pub fn attach<R: NoteRepository>(&mut self, service: &NoteService<R>) {
        if let Some(previous) = self.observer.take() {
            service.unobserve(previous);
        }
        let shared = Arc::clone(&self.shared);
        let subscribed = service.observe_notes(move |notes: &[Note]| {
            let mut state = lock(&shared);
            state.is_loading = false;
            state.notes = notes.to_vec();
            state.error = None;
        });
        match subscribed {
            Ok(id) => self.observer = Some(id),
            Err(err) => {
                warn!("event=notes_list_attach module=service status=error error={err}");
                let mut state = self.lock();
                state.is_loading = false;
                state.error = Some(err.to_string());
            }
        }
    }

    /// Drops the subscription. Returns whether one was active.
    pub fn detach<R: NoteRepository>(&mut self, service: &NoteService<R>) -> bool {
        match self.observer.take() {
            Some(id) => service.unobserve(id),
            None => false,
        }
    }

    pub fn snapshot(&self) -> NotesListSnapshot {
        self.lock().clone()
    }

    /// Opens the delete dialog for `note`.
    pub fn request_delete(&self, note: Note) {
        let mut state = self.lock();
        state.show_delete_dialog = true;
        state.note_to_delete = Some(note);
    }

    pub fn dismiss_delete(&self) {
        let mut state = self.lock();
        state.show_delete_dialog = false;
        state.note_to_delete = None;
    }

    /// Deletes the note awaiting confirmation. No-op without one.
    pub fn confirm_delete<R: NoteRepository>(&self, service: &NoteService<R>) {
        let target = {
            let mut state = self.lock();
            let Some(note) = state.note_to_delete.clone() else {
                return;
            };
            state.is_deleting = true;
            note
        };

        let outcome = service.delete_note(target.id);

        let mut state = self.lock();
        if let Err(err) = outcome {
            warn!(
                "event=notes_list_delete module=service status=error note_id={} error={err}",
                target.id
            );
            state.error = Some(err.to_string());
        } else {
            info!(
                "event=notes_list_delete module=service status=ok note_id={}",
                target.id
            );
        }
        state.is_deleting = false;
        state.show_delete_dialog = false;
        state.note_to_delete = None;
    }

    fn lock(&self) -> MutexGuard<'_, NotesListSnapshot> {
        lock(&self.shared)
    }
}

impl Default for NotesListState {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(shared: &Mutex<NotesListSnapshot>) -> MutexGuard<'_, NotesListSnapshot> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
