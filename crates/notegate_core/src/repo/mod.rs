//! Repository layer for persisted notes.
//!
//! # Responsibility
//! - Define the storage contract consumed by services.
//! - Isolate SQLite query details and change notification.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
pub mod observers;
