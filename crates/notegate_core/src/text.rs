//! Whitespace rules shared by form fields.
//!
//! Form whitespace is every Unicode space separator (`Zs`, `Zl`, `Zp`,
//! including no-break spaces) plus the ASCII controls `\t \n \x0B \x0C \r`
//! and the information separators `\x1C..=\x1F`. NEL (`\u{85}`) is not
//! whitespace here even though `char::is_whitespace` says it is.

/// Returns whether `c` is form whitespace.
pub fn is_form_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{1C}'..='\u{1F}' => true,
        _ => c.is_whitespace(),
    }
}

/// Trims form whitespace from both ends.
pub fn trim_form(value: &str) -> &str {
    value.trim_matches(is_form_whitespace)
}

/// Trims form whitespace from the start only.
pub fn trim_form_start(value: &str) -> &str {
    value.trim_start_matches(is_form_whitespace)
}

/// Whether `value` is empty or form whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.chars().all(is_form_whitespace)
}
