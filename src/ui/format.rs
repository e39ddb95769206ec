//! Shared formatting helpers for tables and detail views.

use chrono::{DateTime, Utc};

/// Format a timestamp for display
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional value, falling back to a dash
pub fn format_optional(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Truncate a string to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
