use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::models::{DailyRecord, DerivedDaily, HeadlineMetric, Lineage};

const DATE_COLUMN: &str = "Reported Date";
const TOTAL_CASES_COLUMN: &str = "Total Cases";

#[derive(Deserialize)]
struct CsvRow {
    #[serde(rename = "Reported Date")]
    date: NaiveDate,
    #[serde(rename = "Total Cases")]
    total_cases: Option<f64>,
    #[serde(rename = "Number of patients hospitalized with COVID-19")]
    hospitalized: Option<f64>,
    #[serde(rename = "Number of patients in ICU due to COVID-19")]
    icu: Option<f64>,
    #[serde(rename = "Number of patients in ICU on a ventilator due to COVID-19")]
    icu_ventilated: Option<f64>,
    #[serde(rename = "Total_Lineage_B.1.1.7")]
    lineage_b117: Option<f64>,
    #[serde(rename = "Total_Lineage_B.1.351")]
    lineage_b1351: Option<f64>,
    #[serde(rename = "Total_Lineage_P.1")]
    lineage_p1: Option<f64>,
}

impl From<CsvRow> for DailyRecord {
    fn from(row: CsvRow) -> Self {
        DailyRecord {
            date: row.date,
            total_cases: row.total_cases,
            hospitalized: row.hospitalized,
            icu: row.icu,
            icu_ventilated: row.icu_ventilated,
            lineage_b117: row.lineage_b117,
            lineage_b1351: row.lineage_b1351,
            lineage_p1: row.lineage_p1,
        }
    }
}

pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![DATE_COLUMN, TOTAL_CASES_COLUMN];
    columns.extend(HeadlineMetric::ALL.iter().map(|metric| metric.column()));
    columns.extend(Lineage::ALL.iter().map(|lineage| lineage.column()));
    columns
}

/// Downloads the feed and parses it. Any failure here is fatal to startup.
pub async fn load(url: &str) -> Result<Vec<DailyRecord>> {
    let body = fetch_csv(url).await?;
    parse_daily(&body)
}

pub async fn fetch_csv(url: &str) -> Result<String> {
    info!(%url, "downloading case feed");
    let fetch_error = |reason: String| DashboardError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url)
        .await
        .map_err(|err| fetch_error(err.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }
    let body = response
        .text()
        .await
        .map_err(|err| fetch_error(err.to_string()))?;

    info!(bytes = body.len(), "case feed downloaded");
    Ok(body)
}

/// Parses the feed into rows sorted by date. Extra columns are ignored.
pub fn parse_daily(text: &str) -> Result<Vec<DailyRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = required_columns()
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::Schema(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(|err| {
            DashboardError::Schema(format!("data row {}: {}", index + 1, err))
        })?;
        records.push(DailyRecord::from(row));
    }

    records.sort_by_key(|record| record.date);
    if let Some(pair) = records.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(DashboardError::Schema(format!(
            "duplicate reported date {}",
            pair[0].date
        )));
    }

    info!(rows = records.len(), "parsed daily records");
    Ok(records)
}

/// Attaches day-over-day new cases computed from the cumulative total.
pub fn derive_daily(records: Vec<DailyRecord>) -> Vec<DerivedDaily> {
    let mut previous_total: Option<Option<f64>> = None;
    records
        .into_iter()
        .map(|record| {
            let total_new_cases = match (previous_total, record.total_cases) {
                (Some(Some(prior)), Some(current)) => Some(current - prior),
                _ => None,
            };
            previous_total = Some(record.total_cases);
            DerivedDaily {
                record,
                total_new_cases,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{constant_growth, date, record};

    const HEADER: &str = "Reported Date,Confirmed Positive,Total Cases,Number of patients hospitalized with COVID-19,Number of patients in ICU due to COVID-19,Number of patients in ICU on a ventilator due to COVID-19,Total_Lineage_B.1.1.7,Total_Lineage_B.1.351,Total_Lineage_P.1";

    #[test]
    fn parses_rows_and_blank_cells() {
        let text = format!(
            "{HEADER}\n2021-02-02,500,270000,900,320,220,,,\n2021-02-03,480,271000.0,910,322,219,60,2,1\n"
        );
        let records = parse_daily(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(2021, 2, 2));
        assert_eq!(records[0].lineage_b117, None);
        assert_eq!(records[1].total_cases, Some(271_000.0));
        assert_eq!(records[1].lineage_b117, Some(60.0));
        assert_eq!(records[1].icu_ventilated, Some(219.0));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let text = "Reported Date,Total Cases\n2021-02-02,1\n";
        let err = parse_daily(text).unwrap_err();
        match err {
            DashboardError::Schema(message) => {
                assert!(message.contains("Total_Lineage_P.1"));
                assert!(message.contains("Number of patients in ICU due to COVID-19"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_date_is_a_schema_error() {
        let text = format!("{HEADER}\n02/02/2021,1,2,3,4,5,,,\n");
        assert!(matches!(parse_daily(&text), Err(DashboardError::Schema(_))));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let text = format!("{HEADER}\n2021-02-02,1,2,3,4,5,,,\n2021-02-02,1,3,3,4,5,,,\n");
        assert!(matches!(parse_daily(&text), Err(DashboardError::Schema(_))));
    }

    #[test]
    fn rows_are_sorted_ascending() {
        let text = format!("{HEADER}\n2021-02-03,1,20,3,4,5,,,\n2021-02-02,1,10,3,4,5,,,\n");
        let records = parse_daily(&text).unwrap();
        assert_eq!(records[0].date, date(2021, 2, 2));
        assert_eq!(records[1].date, date(2021, 2, 3));
    }

    #[test]
    fn new_cases_are_day_over_day_differences() {
        let records = vec![
            record(date(2021, 3, 1), 100.0),
            record(date(2021, 3, 2), 130.0),
            record(date(2021, 3, 3), 125.0),
        ];
        let derived = derive_daily(records.clone());
        assert_eq!(derived[0].total_new_cases, None);
        for i in 1..records.len() {
            let expected = records[i].total_cases.unwrap() - records[i - 1].total_cases.unwrap();
            assert_eq!(derived[i].total_new_cases, Some(expected));
        }
    }

    #[test]
    fn blank_totals_leave_deltas_undefined() {
        let mut records = constant_growth(date(2021, 3, 1), 4, 10.0);
        records[1].total_cases = None;
        let derived = derive_daily(records);
        assert_eq!(derived[1].total_new_cases, None);
        assert_eq!(derived[2].total_new_cases, None);
        assert_eq!(derived[3].total_new_cases, Some(10.0));
    }
}
