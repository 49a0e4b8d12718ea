//! Timetable timestamp parsing.
//!
//! The feed writes every time column as `dd.mm.yyyy HH:MM`. Columns suffixed `_LOCAL`
//! and `_UTC` are separate feed values; no conversion happens here, the wall-clock
//! value is taken as UTC as-is.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Format shared by all timetable time columns, e.g. `08.11.2025 14:10`
pub const FEED_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Parse a feed timestamp, returning `None` for blank or malformed input.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(trimmed, FEED_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a raw tree node. Only string nodes can carry a timestamp.
pub fn parse_value(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value.and_then(Value::as_str).and_then(parse)
}

/// Render an instant back in the feed's own format
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.format(FEED_TIMESTAMP_FORMAT).to_string()
}
