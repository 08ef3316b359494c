//! Sale-date text parsing.
//!
//! Marketplaces report sale dates in a handful of human-readable forms.
//! The display string is kept for reporting; the parsed timestamp is what
//! aggregation compares on.

use appraiser_core::TimestampMs;
use chrono::{DateTime, NaiveDate};

/// Date formats tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%d %b %y",
    "%d %b %Y",
    "%b %d, %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

/// Parse a human-readable sale date into a UTC timestamp (ms).
///
/// Dates without a time component resolve to midnight UTC. Returns `None`
/// for unparseable text; the caller decides whether to skip the record.
pub fn parse_sale_date(text: &str) -> Option<TimestampMs> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(midnight.and_utc().timestamp_millis());
        }
    }

    None
}
