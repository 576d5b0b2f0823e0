use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

use crate::error::{DashboardError, Result};
use crate::models::{DateDomain, DerivedDaily};

pub fn domain(rows: &[DerivedDaily]) -> Result<DateDomain> {
    let min = rows.iter().map(DerivedDaily::date).min();
    let max = rows.iter().map(DerivedDaily::date).max();
    match (min, max) {
        (Some(min), Some(max)) => Ok(DateDomain { min, max }),
        _ => Err(DashboardError::InsufficientData(
            "no daily records to build a date range from".to_string(),
        )),
    }
}

/// Slider tick labels keyed by local-midnight timestamp.
///
/// The first label sits one day after `min`, then every `every_nth` day.
pub fn marks(min: NaiveDate, max: NaiveDate, every_nth: usize) -> BTreeMap<i64, String> {
    let every_nth = every_nth.max(1);
    let domain = DateDomain { min, max };
    domain
        .days()
        .enumerate()
        .filter(|(index, _)| index % every_nth == 1 % every_nth)
        .map(|(_, day)| (unix_seconds(day), day.format("%Y-%m-%d").to_string()))
        .collect()
}

/// Seconds since the epoch at local midnight of `date`.
pub fn unix_seconds(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.timestamp(),
        // Midnight skipped by a DST jump.
        None => midnight.and_utc().timestamp(),
    }
}

/// Local-midnight timestamp of every day in `domain`, indexed by day offset
/// from `domain.min`.
///
/// The range inputs step through these indices rather than through seconds,
/// since local midnights are not a fixed number of seconds apart across a
/// daylight-saving change.
pub fn day_stamps(domain: &DateDomain) -> Vec<i64> {
    domain.days().map(unix_seconds).collect()
}

pub fn day_offset(min: NaiveDate, date: NaiveDate) -> i64 {
    (date - min).num_days()
}

/// Local calendar date of a timestamp produced by [`unix_seconds`].
pub fn date_from_unix(seconds: i64) -> Option<NaiveDate> {
    Local
        .timestamp_opt(seconds, 0)
        .earliest()
        .map(|local| local.date_naive())
}
