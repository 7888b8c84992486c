//! Time-cadence utilities for datetime axes.

use crate::error::{GridError, Result};
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use std::collections::BTreeMap;

/// Count the samples per calendar year, requiring every year to hold the
/// same number.
///
/// This is the cadence probe used by the seasonal-cycle fits: monthly data
/// yields 12, daily data 365/366 would already fail the evenness check
/// across leap years.
pub fn steps_per_year(times: &[DateTime<Utc>]) -> Result<usize> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for t in times {
        *counts.entry(t.year()).or_insert(0) += 1;
    }
    let values: Vec<usize> = counts.values().copied().collect();
    match values.first() {
        None => Ok(0),
        Some(&first) if values.iter().all(|&c| c == first) => Ok(first),
        _ => Err(GridError::UnevenYears { counts: values }),
    }
}

/// Check that every timestamp sits exactly at a month start (midnight on
/// the 1st). This is the strict monthly-resolution test used before
/// re-centering a monthly time axis.
pub fn is_month_start_cadence(times: &[DateTime<Utc>]) -> bool {
    !times.is_empty()
        && times.iter().all(|t| {
            t.day() == 1
                && t.hour() == 0
                && t.minute() == 0
                && t.second() == 0
                && t.nanosecond() == 0
        })
}

/// Midnight on the first day of `t`'s month.
pub fn month_start(t: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(t.year(), t.month(), 1, 0, 0, 0)
        .single()
        .expect("first of month is a valid UTC datetime")
}

/// Midnight on the given day of `t`'s month.
pub fn centered_on_day(t: DateTime<Utc>, day: u32) -> DateTime<Utc> {
    month_start(t) + Duration::days(day as i64 - 1)
}
