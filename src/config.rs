use std::net::{IpAddr, Ipv4Addr};

use chrono::NaiveDate;

use crate::models::{HeadlineMetric, Lineage};

pub const DEFAULT_SOURCE_URL: &str = "https://data.ontario.ca/dataset/f4f86e54-872d-43f8-8a86-3892fd3cb5e6/resource/ed270bb8-340b-41f9-a7c6-e8ef587e6d11/download/covidtesting.csv";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_MARK_EVERY: usize = 100;

/// Reported dates are shifted back this many days before weekly bucketing.
pub const EXPOSURE_OFFSET_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source_url: String,
    /// First reported date with lineage counts in the feed.
    pub variant_cutoff: NaiveDate,
    pub tracked_lineages: Vec<Lineage>,
    pub headline_metrics: Vec<HeadlineMetric>,
    /// Slider tick spacing in days.
    pub mark_every_nth: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            variant_cutoff: NaiveDate::from_ymd_opt(2021, 1, 15).unwrap_or(NaiveDate::MIN),
            tracked_lineages: Lineage::ALL.to_vec(),
            headline_metrics: HeadlineMetric::ALL.to_vec(),
            mark_every_nth: DEFAULT_MARK_EVERY,
        }
    }
}
