//! Core use-case services.
//!
//! # Responsibility
//! - Compose the body gate with storage into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod draft;
pub mod note_service;
pub mod notes_list;
