use crate::error::{DashboardError, Result};
use crate::models::{DerivedDaily, HeadlineMetric, MetricSnapshot, MetricsSummary, Trend};

pub const BLOCK_LEN: usize = 7;

/// Compares the latest seven rows against the seven before them.
///
/// Blocks are taken by row position after sorting newest first, so a gap in
/// the reported dates shifts the blocks rather than shortening them.
pub fn summarize(rows: &[DerivedDaily], metrics: &[HeadlineMetric]) -> Result<MetricsSummary> {
    if rows.len() < BLOCK_LEN * 2 {
        return Err(DashboardError::InsufficientData(format!(
            "week-over-week comparison needs {} rows, found {}",
            BLOCK_LEN * 2,
            rows.len()
        )));
    }

    let mut newest_first: Vec<&DerivedDaily> = rows.iter().collect();
    newest_first.sort_by(|a, b| b.date().cmp(&a.date()));
    let this_week = &newest_first[..BLOCK_LEN];
    let prior_week = &newest_first[BLOCK_LEN..BLOCK_LEN * 2];

    let mut snapshots = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        let value_this_week = round_half_even(block_mean(this_week, metric)?);
        let value_prior_week = round_half_even(block_mean(prior_week, metric)?);
        let delta = value_this_week - value_prior_week;
        snapshots.push(MetricSnapshot {
            metric,
            value_this_week,
            value_prior_week,
            delta,
            trend: Trend::from_delta(delta),
        });
    }

    Ok(MetricsSummary { metrics: snapshots })
}

/// Mean over the rows that report the metric; blank cells are skipped.
fn block_mean(block: &[&DerivedDaily], metric: HeadlineMetric) -> Result<f64> {
    let values: Vec<f64> = block
        .iter()
        .filter_map(|row| row.record.metric(metric))
        .collect();

    if values.is_empty() {
        let first = block.last().map(|row| row.date());
        let last = block.first().map(|row| row.date());
        return Err(DashboardError::InsufficientData(format!(
            "no values for \"{}\" between {:?} and {:?}",
            metric.column(),
            first,
            last
        )));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}
