//! Calendar date helpers.
//!
//! Every date the engine handles is a calendar day in the consumer's
//! local time zone. Raw timestamps are reduced to a [`NaiveDate`] here so
//! that two events on the same local day always share one key.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

const DAY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Reduce a raw date or timestamp to the local calendar date.
///
/// Accepts:
/// - `YYYY-MM-DD` (taken as-is)
/// - RFC 3339 timestamps, shifted into `offset` before the date is taken
/// - naive `YYYY-MM-DDTHH:MM:SS[.f]` / `YYYY-MM-DD HH:MM:SS`, already local
///
/// Returns `None` for anything else.
pub fn normalize_date(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Strictly parse a canonical `YYYY-MM-DD` date.
pub fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Canonical `YYYY-MM-DD` key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// The date `n` days before `date`, saturating at the calendar minimum.
pub fn days_back(date: NaiveDate, n: i64) -> NaiveDate {
    date.checked_sub_signed(Duration::days(n))
        .unwrap_or(NaiveDate::MIN)
}

/// Number of days in the given month, or `None` if the month is invalid.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Offset of the first of the month from Sunday (0 = Sunday).
pub fn first_weekday_offset(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
}
