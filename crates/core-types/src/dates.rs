//! Serde helpers for the calendar dates carried by records.
//!
//! Browsers send dates either as a plain `YYYY-MM-DD` string (from a date
//! input) or as a full ISO-8601 timestamp (a serialized JS `Date`). Both are
//! accepted; the UTC calendar day is what gets stored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Parses a calendar date from either a plain date or a full timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.date())
}

/// `deserialize_with` target for `Option<NaiveDate>` fields.
///
/// `null`, a missing field and an empty string all map to `None`.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {text:?}"))),
    }
}
