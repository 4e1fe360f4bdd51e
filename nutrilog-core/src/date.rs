//! Date keys for daily logs.
//!
//! The store treats a date as an opaque `YYYY-MM-DD` string. These helpers are
//! only for callers that navigate between days.

use chrono::{Duration, Local, NaiveDate};

use crate::error::{LogError, LogResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's local date as a log key.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

pub fn parse_date(date: &str) -> LogResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| LogError::InvalidDate(date.to_string()))
}

/// The key `days` after `date` (negative for earlier days).
pub fn shift_date(date: &str, days: i64) -> LogResult<String> {
    let shifted = parse_date(date)?
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| LogError::InvalidDate(date.to_string()))?;
    Ok(shifted.format(DATE_FORMAT).to_string())
}

/// Canonical zero-padded key for any date `parse_date` accepts.
pub fn normalize_date(date: &str) -> LogResult<String> {
    Ok(parse_date(date)?.format(DATE_FORMAT).to_string())
}
