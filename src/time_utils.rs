// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.
//!
//! Health logs are keyed by local calendar date in `YYYY-MM-DD` form. The
//! string form sorts the same way as the date, which the range queries rely on.

use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Format any date-like value as zero-padded `YYYY-MM-DD`.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// Components do not need to be zero-padded (`2025-1-5` is accepted), but
/// they must name a real calendar day.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let invalid = || AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", date));

    let mut parts = date.trim().splitn(3, '-');
    let year: i32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let month: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let day: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Local-time midnight at the start of `date`.
pub fn local_midnight(date: NaiveDate) -> Result<DateTime<Local>> {
    let no_midnight = || AppError::BadRequest(format!("No local midnight on {}", date));
    let naive = date.and_hms_opt(0, 0, 0).ok_or_else(no_midnight)?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(no_midnight)
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether a `YYYY-MM-DD` string is today's local date.
pub fn is_today(date: &str) -> bool {
    date == format_date(&today())
}

/// Human-readable date, e.g. `Tue, Dec 16, 2025`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// Analytics look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePeriod {
    Week,
    Month,
    Year,
}

impl DatePeriod {
    /// Fixed day counts; a "month" is always 30 days.
    pub fn days(self) -> u64 {
        match self {
            DatePeriod::Week => 7,
            DatePeriod::Month => 30,
            DatePeriod::Year => 365,
        }
    }
}

/// Inclusive `YYYY-MM-DD` bounds for a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// Range ending today and reaching back one period.
pub fn get_date_range(period: DatePeriod) -> DateRange {
    date_range_ending(today(), period)
}

/// Range ending on `end` and reaching back one period.
pub fn date_range_ending(end: NaiveDate, period: DatePeriod) -> DateRange {
    let start = end
        .checked_sub_days(Days::new(period.days()))
        .unwrap_or(NaiveDate::MIN);

    DateRange {
        start_date: format_date(&start),
        end_date: format_date(&end),
    }
}
