//! Allow-list validator for note bodies.
//!
//! # Responsibility
//! - Scan a body for tag-shaped tokens and check each name against
//!   [`ALLOWED_TAGS`].
//! - Enforce the anchor rule: opening `<a>` tokens must carry `href=`.
//!
//! # Invariants
//! - Input is trimmed of form whitespace before every check.
//! - Length is checked before any tag is scanned.
//! - The first violation wins; later tokens are never examined.
//! - Text that does not match the token shape is inert and never rejected.
//!
//! The token shape is `<`, optional `/`, an ASCII alphanumeric name, any run
//! of non-`>` characters, then `>`. It is not an HTML parser: quoting and
//! attribute syntax are not checked, and a `<` that cannot be bounded by a
//! later `>` is plain text.

use crate::text::trim_form;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum accepted body length in UTF-16 code units, after trimming.
pub const MAX_BODY_CHARS: usize = 50_000;

/// Tag names accepted in note bodies, lower-case.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "b", "i", "u", "a", "ul", "ol", "li", "br", "h1", "h2", "h3", "button", "script",
    "style", "img", "video", "audio", "source", "track", "canvas", "table", "tbody", "tr", "td",
    "th", "form", "input", "select", "option", "textarea", "fieldset", "legend", "label", "span",
    "pre", "code", "hr",
];

static ALLOWED_TAG_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_TAGS.iter().copied().collect());
static TAG_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z0-9]+)([^>]*)>").expect("valid tag token regex"));
static HREF_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhref=").expect("valid href regex"));

/// Reason a body was rejected.
///
/// `Display` output is the user-facing message and is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRejection {
    /// Body is empty after trimming.
    Required,
    /// Trimmed body exceeds [`MAX_BODY_CHARS`].
    TooLong,
    /// A scanned tag name is not in the allow-list (lower-cased).
    DisallowedTag(String),
    /// An opening `<a>` token has no `href=` attribute.
    AnchorMissingHref,
}

impl BodyRejection {
    /// Short stable label for log lines; never contains user text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "body_required",
            Self::TooLong => "body_too_long",
            Self::DisallowedTag(_) => "disallowed_tag",
            Self::AnchorMissingHref => "anchor_missing_href",
        }
    }
}

impl Display for BodyRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "Body is required"),
            Self::TooLong => write!(f, "Body too long"),
            Self::DisallowedTag(name) => write!(f, "Disallowed tag: <{name}>"),
            Self::AnchorMissingHref => write!(f, "Anchor tags must include href"),
        }
    }
}

impl Error for BodyRejection {}

/// Accept/reject outcome handed to form callers.
///
/// `error` is set if and only if `is_valid` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    /// Successful outcome.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// Failed outcome carrying the rejection message.
    pub fn rejected(reason: &BodyRejection) -> Self {
        Self {
            is_valid: false,
            error: Some(reason.to_string()),
        }
    }
}

impl From<Result<(), BodyRejection>> for ValidationResult {
    fn from(value: Result<(), BodyRejection>) -> Self {
        match value {
            Ok(()) => Self::valid(),
            Err(reason) => Self::rejected(&reason),
        }
    }
}

/// One scanned `<...>` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// Whether `/` preceded the name.
    pub closing: bool,
    /// Tag name, lower-cased.
    pub name: String,
    /// Raw text between the name and `>`.
    pub attrs: &'a str,
}

/// Validates a note body and returns a form-friendly result.
///
/// Total over all inputs; never panics.
pub fn validate(html: &str) -> ValidationResult {
    check_body(html).into()
}

/// Validates a note body, returning the first rejection found.
pub fn check_body(html: &str) -> Result<(), BodyRejection> {
    let body = trim_form(html);
    if body.is_empty() {
        return Err(BodyRejection::Required);
    }
    // UTF-8 byte length bounds the UTF-16 unit count from above.
    if body.len() > MAX_BODY_CHARS && body.encode_utf16().count() > MAX_BODY_CHARS {
        return Err(BodyRejection::TooLong);
    }

    for token in scan_tags(body) {
        check_token(&token)?;
    }
    Ok(())
}

/// Returns whether `name` (any case) is an allowed tag.
pub fn is_allowed_tag(name: &str) -> bool {
    ALLOWED_TAG_SET.contains(name.to_ascii_lowercase().as_str())
}

/// Iterates tag-shaped tokens left to right.
pub fn scan_tags(body: &str) -> impl Iterator<Item = TagToken<'_>> {
    TAG_TOKEN_RE.captures_iter(body).map(|caps| TagToken {
        closing: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
        name: caps
            .get(2)
            .map_or_else(String::new, |m| m.as_str().to_ascii_lowercase()),
        attrs: caps.get(3).map_or("", |m| m.as_str()),
    })
}

fn check_token(token: &TagToken<'_>) -> Result<(), BodyRejection> {
    if !ALLOWED_TAG_SET.contains(token.name.as_str()) {
        return Err(BodyRejection::DisallowedTag(token.name.clone()));
    }
    if token.name == "a" && !token.closing && !HREF_ATTR_RE.is_match(token.attrs) {
        return Err(BodyRejection::AnchorMissingHref);
    }
    Ok(())
}
