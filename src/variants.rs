use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::info;

use crate::config::EXPOSURE_OFFSET_DAYS;
use crate::models::{DerivedDaily, Lineage, LineageCount, WeeklyVariantBucket};

#[derive(Debug, Clone, Default)]
struct WeekTotals {
    lineage_cases: Vec<f64>,
    regular_cases: f64,
    total_new_cases: f64,
}

impl WeekTotals {
    fn empty(lineages: usize) -> Self {
        Self {
            lineage_cases: vec![0.0; lineages],
            ..Self::default()
        }
    }
}

/// Sunday closing the week that contains `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - i64::from(date.weekday().num_days_from_monday());
    date + Duration::days(days_to_sunday)
}

/// Weekly new cases per tracked lineage plus the untracked remainder.
///
/// Deltas are taken within the rows on or after `cutoff`, so the first kept
/// row contributes nothing. `cutoff` applies to reported dates before the
/// exposure shift, so the first week can end before it. The trailing bucket
/// is always dropped because the feed ends part way through it.
pub fn aggregate(
    rows: &[DerivedDaily],
    cutoff: NaiveDate,
    lineages: &[Lineage],
) -> Vec<WeeklyVariantBucket> {
    let mut kept: Vec<&DerivedDaily> = rows.iter().filter(|row| row.date() >= cutoff).collect();
    kept.sort_by_key(|row| row.date());

    let mut weeks: BTreeMap<NaiveDate, WeekTotals> = BTreeMap::new();
    for (index, row) in kept.iter().enumerate() {
        let shifted = row.date() - Duration::days(EXPOSURE_OFFSET_DAYS);
        let week = weeks
            .entry(week_ending(shifted))
            .or_insert_with(|| WeekTotals::empty(lineages.len()));

        let Some(previous) = index.checked_sub(1).map(|prior| kept[prior]) else {
            continue;
        };

        let mut tracked = 0.0;
        for (slot, &lineage) in lineages.iter().enumerate() {
            let current = row.record.lineage_total(lineage).unwrap_or(0.0);
            let prior = previous.record.lineage_total(lineage).unwrap_or(0.0);
            week.lineage_cases[slot] += current - prior;
            tracked += current - prior;
        }

        if let (Some(current), Some(prior)) = (row.record.total_cases, previous.record.total_cases)
        {
            let new_cases = current - prior;
            week.total_new_cases += new_cases;
            week.regular_cases += new_cases - tracked;
        }
    }

    fill_missing_weeks(&mut weeks, lineages.len());

    let mut buckets: Vec<WeeklyVariantBucket> = weeks
        .into_iter()
        .map(|(week_ending, totals)| to_bucket(week_ending, totals, lineages))
        .collect();
    buckets.pop();

    info!(
        rows = kept.len(),
        buckets = buckets.len(),
        %cutoff,
        "aggregated weekly variant buckets"
    );
    buckets
}

fn fill_missing_weeks(weeks: &mut BTreeMap<NaiveDate, WeekTotals>, lineages: usize) {
    let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) else {
        return;
    };
    let mut week = first;
    while week < last {
        weeks
            .entry(week)
            .or_insert_with(|| WeekTotals::empty(lineages));
        week += Duration::days(7);
    }
}

fn to_bucket(week_ending: NaiveDate, totals: WeekTotals, lineages: &[Lineage]) -> WeeklyVariantBucket {
    let total = totals.total_new_cases;
    let lineage_counts = lineages
        .iter()
        .zip(totals.lineage_cases)
        .map(|(&lineage, new_cases)| LineageCount {
            lineage,
            new_cases,
            share: share_of(new_cases, total),
        })
        .collect();

    WeeklyVariantBucket {
        week_ending,
        lineages: lineage_counts,
        regular_cases: totals.regular_cases,
        regular_share: share_of(totals.regular_cases, total),
        total_new_cases: total,
    }
}

fn share_of(count: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(count / total)
    }
}
