use serde::Serialize;
use tracing::debug;

use crate::axis::date_from_unix;
use crate::charts::{self, BarSeries, Figure};
use crate::error::{DashboardError, Result};
use crate::models::{DateDomain, DerivedDaily, SelectionWindow, WeeklyVariantBucket};
use crate::state::AppState;
use crate::summary::round_half_even;

pub const LINE_CHART_TITLE: &str = "Daily number of new COVID-19 cases in Ontario";
pub const BAR_CHART_TITLE: &str = "New Cases Weekly by COVID-19 Variant";
pub const REGULAR_SERIES: &str = "Regular";

/// Everything the page replaces when the range control moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewUpdate {
    pub label: String,
    pub line_chart: Figure,
    pub bar_chart: Figure,
}

impl SelectionWindow {
    /// Window from a pair of range-control timestamps, clamped to `domain`.
    pub fn from_unix(start: i64, end: i64, domain: &DateDomain) -> Result<Self> {
        let to_date = |seconds: i64| {
            date_from_unix(seconds).ok_or_else(|| {
                DashboardError::InvalidSelection(format!("timestamp {seconds} is out of range"))
            })
        };
        let (start, end) = (to_date(start)?, to_date(end)?);
        if start > end {
            return Err(DashboardError::InvalidSelection(format!(
                "start {start} is after end {end}"
            )));
        }

        let window = Self {
            start: start.max(domain.min),
            end: end.min(domain.max),
        };
        if window.start > window.end {
            return Err(DashboardError::InvalidSelection(format!(
                "{start} to {end} lies outside {} to {}",
                domain.min, domain.max
            )));
        }
        Ok(window)
    }
}

pub fn daily_in_window<'a>(
    rows: &'a [DerivedDaily],
    window: SelectionWindow,
) -> impl Iterator<Item = &'a DerivedDaily> {
    rows.iter().filter(move |row| window.contains(row.date()))
}

pub fn weeks_in_window<'a>(
    buckets: &'a [WeeklyVariantBucket],
    window: SelectionWindow,
) -> impl Iterator<Item = &'a WeeklyVariantBucket> {
    buckets
        .iter()
        .filter(move |bucket| window.contains(bucket.week_ending))
}

pub fn date_range_label(window: SelectionWindow) -> String {
    format!("Date Range: {} to {}", window.start, window.end)
}

/// Share as a percentage with two decimals, as printed on the bars.
pub fn percent_label(share: Option<f64>) -> Option<f64> {
    share.map(|share| round_half_even(share * 10_000.0) / 100.0)
}

/// Recomputes the label and both charts for one range-control position.
///
/// Only re-filters the precomputed tables in `state`. An empty window still
/// yields both charts, each annotated as having no data.
pub fn update(state: &AppState, window: SelectionWindow) -> ViewUpdate {
    let (x, y): (Vec<_>, Vec<_>) = daily_in_window(&state.daily, window)
        .map(|row| (row.date(), row.total_new_cases))
        .unzip();
    let line_chart = charts::line_chart(LINE_CHART_TITLE, x, y);

    let weeks: Vec<&WeeklyVariantBucket> = weeks_in_window(&state.variants, window).collect();
    let week_endings: Vec<_> = weeks.iter().map(|bucket| bucket.week_ending).collect();

    let mut series = vec![BarSeries {
        name: REGULAR_SERIES.to_string(),
        x: week_endings.clone(),
        y: weeks.iter().map(|bucket| bucket.regular_cases).collect(),
        text: weeks
            .iter()
            .map(|bucket| percent_label(bucket.regular_share))
            .collect(),
    }];
    for &lineage in &state.lineages {
        let counts: Vec<_> = weeks.iter().map(|bucket| bucket.lineage(lineage)).collect();
        series.push(BarSeries {
            name: lineage.label().to_string(),
            x: week_endings.clone(),
            y: counts
                .iter()
                .map(|&count| count.map_or(0.0, |count| count.new_cases))
                .collect(),
            text: counts
                .iter()
                .map(|&count| percent_label(count.and_then(|count| count.share)))
                .collect(),
        });
    }
    let bar_chart = charts::stacked_bar_chart(BAR_CHART_TITLE, series);

    debug!(
        start = %window.start,
        end = %window.end,
        days = line_chart.data[0].x.len(),
        weeks = week_endings.len(),
        empty = line_chart.is_empty() && bar_chart.is_empty(),
        "view updated"
    );

    ViewUpdate {
        label: date_range_label(window),
        line_chart,
        bar_chart,
    }
}
