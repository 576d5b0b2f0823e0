//! Synthetic daily tables shared by the unit tests.

use chrono::{Duration, NaiveDate};

use crate::loader::derive_daily;
use crate::models::{DailyRecord, DerivedDaily};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn record(date: NaiveDate, total_cases: f64) -> DailyRecord {
    DailyRecord {
        date,
        total_cases: Some(total_cases),
        hospitalized: None,
        icu: None,
        icu_ventilated: None,
        lineage_b117: None,
        lineage_b1351: None,
        lineage_p1: None,
    }
}

/// `days` consecutive rows from `start`, total cases growing by `increment`.
pub fn constant_growth(start: NaiveDate, days: usize, increment: f64) -> Vec<DailyRecord> {
    (0..days)
        .map(|i| record(start + Duration::days(i as i64), 1_000.0 + increment * i as f64))
        .collect()
}

pub fn derived(records: Vec<DailyRecord>) -> Vec<DerivedDaily> {
    derive_daily(records)
}

/// Fills the hospital occupancy columns so the headline metrics can be computed.
pub fn with_occupancy(mut records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    for (i, record) in records.iter_mut().enumerate() {
        let i = i as f64;
        record.hospitalized = Some(700.0 + i);
        record.icu = Some(300.0 - i);
        record.icu_ventilated = Some(200.0);
    }
    records
}
