use std::fmt::Write;

use crate::models::{Trend, WeeklyVariantBucket};
use crate::state::AppState;
use crate::view::percent_label;

fn format_percent(share: Option<f64>) -> String {
    match percent_label(share) {
        Some(percent) => format!("{percent:.2}%"),
        None => "n/a".to_string(),
    }
}

fn format_week(bucket: &WeeklyVariantBucket, state: &AppState) -> String {
    let mut line = format!(
        "- week ending {}: {:.0} new cases, regular {:.0} ({})",
        bucket.week_ending,
        bucket.total_new_cases,
        bucket.regular_cases,
        format_percent(bucket.regular_share)
    );
    for &lineage in &state.lineages {
        if let Some(count) = bucket.lineage(lineage) {
            let _ = write!(
                line,
                ", {} {:.0} ({})",
                lineage.label(),
                count.new_cases,
                format_percent(count.share)
            );
        }
    }
    line
}

/// Plain-text rendition of the headline cards and the weekly variant table.
pub fn build_report(state: &AppState) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# COVID-19 Ontario Summary");
    let _ = writeln!(
        output,
        "Reported {} to {} ({} days)",
        state.domain.min,
        state.domain.max,
        state.daily.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Last 7 Days");

    for snapshot in &state.summary.metrics {
        let direction = match snapshot.trend {
            Trend::Improving => "improving",
            Trend::Worsening => "worsening",
        };
        let _ = writeln!(
            output,
            "- {}: {:.0} (difference compared to 7 days prior: {:.0}, {})",
            snapshot.metric.title(),
            snapshot.value_this_week,
            snapshot.delta,
            direction
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## New Cases Weekly by Variant");

    if state.variants.is_empty() {
        let _ = writeln!(output, "No complete weeks of variant data.");
    } else {
        for bucket in &state.variants {
            let _ = writeln!(output, "{}", format_week(bucket, state));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::fixtures::{constant_growth, date, with_occupancy};

    #[test]
    fn report_lists_metrics_and_weeks() {
        let records = with_occupancy(constant_growth(date(2021, 3, 8), 21, 100.0));
        let state = AppState::build(records, &DashboardConfig::default()).unwrap();
        let report = build_report(&state);

        assert!(report.contains("Reported 2021-03-08 to 2021-03-28 (21 days)"));
        assert!(report.contains(
            "- Average # of Hospitalizations in Last 7 Days: 717 (difference compared to 7 days prior: 7, improving)"
        ));
        assert!(report.contains("- week ending 2021-03-07: 600 new cases, regular 600 (100.00%)"));
        assert!(report.contains(", B.1.1.7 0 (0.00%)"));
        assert_eq!(report.matches("- week ending").count(), 2);
    }

    #[test]
    fn report_without_variant_weeks_says_so() {
        let records = with_occupancy(constant_growth(date(2020, 11, 1), 14, 100.0));
        let state = AppState::build(records, &DashboardConfig::default()).unwrap();
        assert!(build_report(&state).contains("No complete weeks of variant data."));
    }

    #[test]
    fn missing_shares_print_as_not_available() {
        assert_eq!(format_percent(None), "n/a");
        assert_eq!(format_percent(Some(0.25)), "25.00%");
    }
}
