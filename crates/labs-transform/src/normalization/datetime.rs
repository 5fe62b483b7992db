//! Lenient calendar-date parsing.
//!
//! Values are normalized to `YYYY-MM-DD`. Datetimes are truncated to their
//! date; partial dates (year or year-month only) and anything unrecognized
//! do not parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%d-%b-%Y %H:%M",
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S", // European
        "%d/%m/%Y %H:%M",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    None
}

/// Try to parse date-only formats. Month-first is tried before day-first.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",  // US: 01/15/2024
        "%d/%m/%Y",  // European: 15/01/2024
        "%m-%d-%Y",  // 01-15-2024
        "%d-%m-%Y",  // 15-01-2024
        "%d.%m.%Y",  // German: 15.01.2024
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%b %d %Y",  // Jan 15 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
        "%Y-%b-%d",  // 2024-Jan-15
    ];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    try_parse_compact(value)
}

/// `YYYYMMDD` with exactly eight digits.
fn try_parse_compact(value: &str) -> Option<NaiveDate> {
    if value.len() == 8 && value.chars().all(|ch| ch.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }
    None
}

/// Parse a date or datetime string into a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(d) = try_parse_date(trimmed) {
        return Some(d);
    }

    if let Some(dt) = try_parse_datetime(trimmed) {
        return Some(dt.date());
    }

    // Offsets and `Z` suffixes keep the local calendar date.
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .ok()
}

/// Format a NaiveDate to ISO 8601 date string.
pub fn format_iso8601_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Normalize a value to `YYYY-MM-DD`, or `None` when it does not parse.
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(format_iso8601_date)
}
