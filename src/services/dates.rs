//! Ingestion-time date normalisation.
//!
//! Every date that enters the service goes through [`normalize_date`] once, so
//! the rest of the code compares plain `NaiveDate` calendar days.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{AppError, AppResult};

/// Calendar years accepted at ingestion.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=9999;

/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, or an
/// RFC 3339 timestamp (converted to its UTC calendar day).
pub fn normalize_date(input: &str) -> AppResult<NaiveDate> {
    let date = parse_date(input)?;
    if !SUPPORTED_YEARS.contains(&date.year()) {
        return Err(AppError::Validation(format!(
            "Date {date} is out of range: year must be between {} and {}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }
    Ok(date)
}

fn parse_date(input: &str) -> AppResult<NaiveDate> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("Date is required".into()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(AppError::Validation(format!(
        "Invalid date '{raw}': expected YYYY-MM-DD"
    )))
}

/// Normalises an optional date, substituting `default` when absent.
pub fn normalize_or(input: Option<&str>, default: NaiveDate) -> AppResult<NaiveDate> {
    match input {
        Some(raw) => normalize_date(raw),
        None => Ok(default),
    }
}

/// First day of the `days`-day window ending on `end`, both days included.
pub fn window_start(end: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    end.checked_sub_signed(Duration::days(days.max(1) - 1))
        .ok_or_else(|| {
            AppError::Validation(format!("Date {end} is too early for a {days}-day window"))
        })
}

pub fn normalize_opt(input: Option<&str>) -> AppResult<Option<NaiveDate>> {
    input.map(normalize_date).transpose()
}

/// Optional `start_date`/`end_date` filters. Either bound may be absent.
pub fn optional_range(
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = normalize_opt(start)?;
    let end = normalize_opt(end)?;
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(AppError::Validation(
                "start_date must not be after end_date".into(),
            ));
        }
    }
    Ok((start, end))
}

/// Resolves `start_date`/`end_date` query parameters into an inclusive range.
/// Missing bounds default to a window of `default_days` days ending today.
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    default_days: i64,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let today = Utc::now().date_naive();
    let end = normalize_or(end, today)?;
    let start = normalize_or(start, window_start(end, default_days)?)?;
    if start > end {
        return Err(AppError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }
    Ok((start, end))
}
