use std::collections::BTreeMap;

use tracing::info;

use crate::axis;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::loader::derive_daily;
use crate::models::{DailyRecord, DateDomain, DerivedDaily, Lineage, MetricsSummary, WeeklyVariantBucket};
use crate::summary;
use crate::variants;

/// Everything the dashboard serves, derived once from the downloaded feed.
/// Nothing mutates it afterwards, so handlers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub daily: Vec<DerivedDaily>,
    pub variants: Vec<WeeklyVariantBucket>,
    pub summary: MetricsSummary,
    pub domain: DateDomain,
    pub marks: BTreeMap<i64, String>,
    pub lineages: Vec<Lineage>,
}

impl AppState {
    pub fn build(records: Vec<DailyRecord>, config: &DashboardConfig) -> Result<Self> {
        let daily = derive_daily(records);
        let domain = axis::domain(&daily)?;
        let summary = summary::summarize(&daily, &config.headline_metrics)?;
        let variants = variants::aggregate(&daily, config.variant_cutoff, &config.tracked_lineages);
        let marks = axis::marks(domain.min, domain.max, config.mark_every_nth);

        info!(
            days = daily.len(),
            weeks = variants.len(),
            from = %domain.min,
            to = %domain.max,
            "dashboard state ready"
        );

        Ok(Self {
            daily,
            variants,
            summary,
            domain,
            marks,
            lineages: config.tracked_lineages.clone(),
        })
    }
}
