use chrono::NaiveDate;
use serde::Serialize;

/// Variant lineages reported separately from the aggregate case count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Lineage {
    #[serde(rename = "B.1.1.7")]
    B117,
    #[serde(rename = "B.1.351")]
    B1351,
    #[serde(rename = "P.1")]
    P1,
}

impl Lineage {
    pub const ALL: [Lineage; 3] = [Lineage::B117, Lineage::B1351, Lineage::P1];

    pub fn label(self) -> &'static str {
        match self {
            Lineage::B117 => "B.1.1.7",
            Lineage::B1351 => "B.1.351",
            Lineage::P1 => "P.1",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Lineage::B117 => "Total_Lineage_B.1.1.7",
            Lineage::B1351 => "Total_Lineage_B.1.351",
            Lineage::P1 => "Total_Lineage_P.1",
        }
    }
}

/// Hospital occupancy figures shown as headline cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineMetric {
    Hospitalized,
    Icu,
    IcuVentilated,
}

impl HeadlineMetric {
    pub const ALL: [HeadlineMetric; 3] = [
        HeadlineMetric::Hospitalized,
        HeadlineMetric::Icu,
        HeadlineMetric::IcuVentilated,
    ];

    pub fn column(self) -> &'static str {
        match self {
            HeadlineMetric::Hospitalized => "Number of patients hospitalized with COVID-19",
            HeadlineMetric::Icu => "Number of patients in ICU due to COVID-19",
            HeadlineMetric::IcuVentilated => {
                "Number of patients in ICU on a ventilator due to COVID-19"
            }
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HeadlineMetric::Hospitalized => "Average # of Hospitalizations in Last 7 Days",
            HeadlineMetric::Icu => "Average # of ICUs in Last 7 Days",
            HeadlineMetric::IcuVentilated => "Average # of ICUs on a Ventilator in Last 7 Days",
        }
    }
}

/// One reported day. Cumulative and occupancy fields are blank in the feed
/// before the province started reporting them.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_cases: Option<f64>,
    pub hospitalized: Option<f64>,
    pub icu: Option<f64>,
    pub icu_ventilated: Option<f64>,
    pub lineage_b117: Option<f64>,
    pub lineage_b1351: Option<f64>,
    pub lineage_p1: Option<f64>,
}

impl DailyRecord {
    pub fn metric(&self, metric: HeadlineMetric) -> Option<f64> {
        match metric {
            HeadlineMetric::Hospitalized => self.hospitalized,
            HeadlineMetric::Icu => self.icu,
            HeadlineMetric::IcuVentilated => self.icu_ventilated,
        }
    }

    pub fn lineage_total(&self, lineage: Lineage) -> Option<f64> {
        match lineage {
            Lineage::B117 => self.lineage_b117,
            Lineage::B1351 => self.lineage_b1351,
            Lineage::P1 => self.lineage_p1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDaily {
    pub record: DailyRecord,
    /// `None` on the first row and wherever either neighbouring total is blank.
    pub total_new_cases: Option<f64>,
}

impl DerivedDaily {
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineageCount {
    pub lineage: Lineage,
    pub new_cases: f64,
    pub share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyVariantBucket {
    pub week_ending: NaiveDate,
    pub lineages: Vec<LineageCount>,
    pub regular_cases: f64,
    pub regular_share: Option<f64>,
    pub total_new_cases: f64,
}

impl WeeklyVariantBucket {
    pub fn lineage(&self, lineage: Lineage) -> Option<&LineageCount> {
        self.lineages.iter().find(|count| count.lineage == lineage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        if delta >= 0.0 {
            Trend::Improving
        } else {
            Trend::Worsening
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Improving => "green",
            Trend::Worsening => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub metric: HeadlineMetric,
    pub value_this_week: f64,
    pub value_prior_week: f64,
    pub delta: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub metrics: Vec<MetricSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateDomain {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateDomain {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let max = self.max;
        self.min.iter_days().take_while(move |day| *day <= max)
    }
}

/// Inclusive date window picked on the range control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SelectionWindow {
    pub fn full(domain: &DateDomain) -> Self {
        Self {
            start: domain.min,
            end: domain.max,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
