//! Timestamp storage format.
//!
//! Timestamps are stored as UTC RFC 3339 text with fixed microsecond
//! precision, so text ordering equals time ordering and SQLite's `date()`
//! can extract the calendar day.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;

pub fn to_db(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp column, reporting bad data as a conversion error
pub fn from_db(column: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse a `date(...)` column (YYYY-MM-DD)
pub fn date_from_db(column: usize, value: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// First instant of a day, in storage format
pub fn start_of_day(day: NaiveDate) -> String {
    to_db(&day.and_hms_micro_opt(0, 0, 0, 0).unwrap_or_default().and_utc())
}

/// Last representable instant of a day, in storage format
pub fn end_of_day(day: NaiveDate) -> String {
    to_db(&day.and_hms_micro_opt(23, 59, 59, 999_999).unwrap_or_default().and_utc())
}
