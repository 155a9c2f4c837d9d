//! Timestamp helpers.
//!
//! Submission times are stored as human-readable strings. Identity and
//! display only ever look at the leading `YYYY-MM-DD HH:MM`.

use chrono::{DateTime, FixedOffset};

/// Width of `YYYY-MM-DD HH:MM`.
pub const MINUTE_PREFIX_LEN: usize = 16;

/// Render an instant the way forms store it.
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.9f %z").to_string()
}

/// Truncate a stored timestamp to minute granularity.
///
/// Strings shorter than the minute prefix are returned unchanged.
pub fn to_the_minute(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(MINUTE_PREFIX_LEN) {
        Some((idx, _)) => &timestamp[..idx],
        None => timestamp,
    }
}
