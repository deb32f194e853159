//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its insert request.
//! - Validate note titles.
//!
//! # Invariants
//! - Titles are stored without leading/trailing whitespace.
//! - Title length is bounded by [`MAX_TITLE_CHARS`].

use crate::text::{is_blank, trim_form_start};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned note identifier (SQLite rowid).
pub type NoteId = i64;

/// Maximum accepted title length in UTF-16 code units.
pub const MAX_TITLE_CHARS: usize = 120;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// HTML body, accepted by the body gate before persistence.
    pub body: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Insert request for a new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub created_at: i64,
}

impl NewNote {
    pub fn new(title: impl Into<String>, body: impl Into<String>, created_at: i64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            created_at,
        }
    }
}

/// Reason a title was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRejection {
    Required,
    TooLong,
}

impl Display for TitleRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "Title is required"),
            Self::TooLong => write!(f, "Title too long"),
        }
    }
}

impl Error for TitleRejection {}

/// Checks a title as typed by the user.
///
/// Leading whitespace is ignored; trailing whitespace counts toward length
/// so that live form validation matches what the user sees.
pub fn validate_title(raw: &str) -> Result<(), TitleRejection> {
    let title = trim_form_start(raw);
    if is_blank(title) {
        return Err(TitleRejection::Required);
    }
    if title.encode_utf16().count() > MAX_TITLE_CHARS {
        return Err(TitleRejection::TooLong);
    }
    Ok(())
}
