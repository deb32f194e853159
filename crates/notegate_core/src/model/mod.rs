//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the note record shared by storage, services and FFI.
//! - Own title rules that do not depend on storage.
//!
//! # Invariants
//! - Every persisted note is identified by a storage-assigned `NoteId`.
//! - `created_at` is Unix epoch milliseconds chosen by the caller.

pub mod note;
