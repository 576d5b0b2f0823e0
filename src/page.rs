//! Dashboard page served at `/`.
//!
//! Headline cards are rendered here; the charts are filled in by the inline
//! script, which asks `/api/update` for figures whenever either range input
//! changes and hands them to plotly.js. The inputs step by day index and the
//! script looks up each index's local-midnight timestamp before asking.

use std::fmt::Write;

use crate::axis::{date_from_unix, day_offset, day_stamps};
use crate::models::{MetricSnapshot, MetricsSummary};
use crate::state::AppState;

pub const PAGE_TITLE: &str = "COVID-19 Ontario Dashboard";

pub fn render_page(state: &AppState) -> String {
    let last = day_offset(state.domain.min, state.domain.max);
    let stamps = day_stamps(&state.domain)
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>{css}</style>
</head>
<body>
    <h1>{title}</h1>
    <div id="header-text">A dashboard to help reveal the severity of the third-wave of COVID-19 in Ontario.</div>
    <div class="metrics">
{metrics}    </div>
    <div class="charts">
        <div class="six columns"><div id="graph-with-slider"></div></div>
        <div class="six columns"><div id="stack-bar"></div></div>
    </div>
    <div class="twelve columns">
        <div id="slider-text">Use the date slider below to select dates for the graphs. Note that the graph on the right only starts around 01/2021.</div>
        <p id="date-range"></p>
        <input type="range" id="date-start" min="0" max="{last}" step="1" value="0" list="date-marks">
        <input type="range" id="date-end" min="0" max="{last}" step="1" value="{last}" list="date-marks">
        <datalist id="date-marks">
{marks}        </datalist>
    </div>
    <script>const dayStamps = [{stamps}];</script>
    <script>{js}</script>
</body>
</html>"#,
        title = PAGE_TITLE,
        css = inline_css(),
        metrics = render_metrics(&state.summary),
        marks = render_marks(state),
        last = last,
        stamps = stamps,
        js = inline_javascript(),
    )
}

fn render_metrics(summary: &MetricsSummary) -> String {
    let mut output = String::new();
    for snapshot in &summary.metrics {
        let _ = write!(output, "{}", render_metric_card(snapshot));
    }
    output
}

fn render_metric_card(snapshot: &MetricSnapshot) -> String {
    format!(
        r#"        <div class="four columns metric">
            <p>{title}</p>
            <h2>{value:.0}</h2>
            <p class="{class}">Difference compared to 7 days prior: {delta:.0}</p>
        </div>
"#,
        title = snapshot.metric.title(),
        value = snapshot.value_this_week,
        class = snapshot.trend.css_class(),
        delta = snapshot.delta,
    )
}

fn render_marks(state: &AppState) -> String {
    let mut output = String::new();
    for (&seconds, label) in &state.marks {
        let Some(day) = date_from_unix(seconds) else {
            continue;
        };
        let index = day_offset(state.domain.min, day);
        let _ = writeln!(
            output,
            r#"            <option value="{index}" label="{label}"></option>"#
        );
    }
    output
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
h1 { color: #333; }
.metrics, .charts { display: flex; gap: 20px; flex-wrap: wrap; }
.four.columns { flex: 1; min-width: 220px; }
.six.columns { flex: 1; min-width: 420px; }
.twelve.columns { margin-top: 20px; }
.metric { background: white; border-radius: 8px; padding: 10px 15px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.green { color: #28a745; }
.red { color: #dc3545; }
input[type=range] { width: 100%; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
const startInput = document.getElementById('date-start');
const endInput = document.getElementById('date-end');
let latest = 0;

async function refresh() {
    const request = ++latest;
    const first = Math.min(startInput.value, endInput.value);
    const last = Math.max(startInput.value, endInput.value);
    const start = dayStamps[first];
    const end = dayStamps[last];
    try {
        const response = await fetch(`/api/update?start=${start}&end=${end}`);
        if (!response.ok) {
            console.warn('update rejected:', await response.text());
            return;
        }
        const update = await response.json();
        if (request !== latest) {
            return;
        }
        document.getElementById('date-range').textContent = update.label;
        Plotly.react('graph-with-slider', update.line_chart.data, update.line_chart.layout);
        Plotly.react('stack-bar', update.bar_chart.data, update.bar_chart.layout);
    } catch (err) {
        console.error('update failed:', err);
    }
}

startInput.addEventListener('change', refresh);
endInput.addEventListener('change', refresh);
refresh();
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::fixtures::{constant_growth, date, with_occupancy};

    #[test]
    fn page_has_cards_charts_and_slider() {
        let records = with_occupancy(constant_growth(date(2021, 1, 1), 30, 100.0));
        let config = DashboardConfig {
            mark_every_nth: 10,
            ..DashboardConfig::default()
        };
        let state = AppState::build(records, &config).unwrap();
        let html = render_page(&state);

        assert!(html.contains("<title>COVID-19 Ontario Dashboard</title>"));
        assert_eq!(html.matches("four columns metric").count(), 3);
        assert!(html.contains("Average # of ICUs on a Ventilator in Last 7 Days"));
        assert!(html.contains(r#"id="graph-with-slider""#));
        assert!(html.contains(r#"id="stack-bar""#));
        assert_eq!(html.matches("<option ").count(), 3);
        assert!(html.contains(r#"<option value="1" label="2021-01-02">"#));
        assert!(html.contains(r#"<option value="21" label="2021-01-22">"#));
    }

    #[test]
    fn range_inputs_default_to_the_whole_domain() {
        // January to June crosses the spring clock change in most zones that
        // observe one; day indices keep the last day reachable.
        let records = with_occupancy(constant_growth(date(2021, 1, 1), 152, 100.0));
        let state = AppState::build(records, &DashboardConfig::default()).unwrap();
        assert_eq!(state.domain.max, date(2021, 6, 1));
        let html = render_page(&state);

        assert!(html.contains(
            r#"id="date-start" min="0" max="151" step="1" value="0""#
        ));
        assert!(html.contains(
            r#"id="date-end" min="0" max="151" step="1" value="151""#
        ));

        let stamps = html
            .split("const dayStamps = [")
            .nth(1)
            .and_then(|rest| rest.split("];").next())
            .unwrap();
        let stamps: Vec<i64> = stamps.split(',').map(|s| s.parse().unwrap()).collect();
        assert_eq!(stamps.len(), 152);
        assert_eq!(date_from_unix(stamps[0]), Some(date(2021, 1, 1)));
        assert_eq!(date_from_unix(stamps[151]), Some(date(2021, 6, 1)));
    }

    #[test]
    fn metric_card_shows_rounded_value_and_trend_class() {
        let records = with_occupancy(constant_growth(date(2021, 1, 1), 14, 100.0));
        let state = AppState::build(records, &DashboardConfig::default()).unwrap();
        let html = render_page(&state);

        // Hospitalizations rise by one a day and ICU counts fall by one a day.
        assert!(html.contains("<h2>710</h2>"));
        assert!(html.contains(r#"<p class="green">Difference compared to 7 days prior: 7</p>"#));
        assert!(html.contains(r#"<p class="red">Difference compared to 7 days prior: -7</p>"#));
    }
}
