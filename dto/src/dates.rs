use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a backend date-time string into a local date-time.
///
/// The backend sends `LocalDateTime` values without an offset. Values that
/// do carry one (`Z` or `+hh:mm`) are converted to the local zone. Empty or
/// malformed input yields `None`.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let parsed = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    if parsed.is_some() {
        return parsed;
    }

    // Date only, treat as start of day
    parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a `YYYY-MM-DD` day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Same as [`parse_datetime`] but for optional fields.
pub fn parse_optional(value: Option<&str>) -> Option<NaiveDateTime> {
    value.and_then(parse_datetime)
}

/// A DTO with its start/end strings mapped to date-times for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dated<T> {
    #[serde(flatten)]
    pub dto: T,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}
