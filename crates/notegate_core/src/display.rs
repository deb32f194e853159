//! Human-facing formatting helpers.

use chrono::DateTime;

/// Formats epoch milliseconds as `d MMMM yyyy` in UTC, e.g. `17 July 2025`.
///
/// Returns `None` when the timestamp is outside the representable range.
pub fn format_epoch_millis(epoch_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.format("%-d %B %Y").to_string())
}
