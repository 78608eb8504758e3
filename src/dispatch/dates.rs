use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every calendar date from `start` to `end` inclusive.
///
/// An inverted range yields `[start]` only.
pub fn date_range_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return vec![start];
    }

    start.iter_days().take_while(|d| *d <= end).collect()
}

/// [`date_range_days`] formatted as `YYYY-MM-DD`.
pub fn expand_date_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    date_range_days(start, end)
        .into_iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Parses a form date into the local calendar day.
///
/// Plain `YYYY-MM-DD` is taken as-is. RFC 3339 timestamps keep the offset
/// they were sent with, so `2024-03-01T00:30:00+09:00` is March 1 whatever
/// zone the server runs in.
pub fn parse_local_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::InvalidInput(format!("Invalid date: {}", value)))
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;

    Ok((first, next - Duration::days(1)))
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
