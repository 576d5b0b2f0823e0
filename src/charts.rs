//! Figure descriptions in the shape plotly.js accepts for `Plotly.react`.

use chrono::NaiveDate;
use serde::Serialize;

pub const EMPTY_NOTICE: &str = "No data in selected range";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
}

impl Annotation {
    fn centered(text: &str) -> Self {
        Self {
            text: text.to_string(),
            showarrow: false,
            xref: "paper",
            yref: "paper",
            x: 0.5,
            y: 0.5,
        }
    }
}

/// One stacked series of the weekly bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    /// Percent labels drawn on the bars; `None` renders blank.
    pub text: Vec<Option<f64>>,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|trace| trace.x.is_empty())
    }
}

pub fn line_chart(title: &str, x: Vec<NaiveDate>, y: Vec<Option<f64>>) -> Figure {
    let empty = x.is_empty();
    Figure {
        data: vec![Trace {
            kind: TraceKind::Scatter,
            name: None,
            mode: Some("lines"),
            x,
            y,
            text: None,
            textposition: None,
        }],
        layout: Layout {
            title: Title {
                text: title.to_string(),
            },
            barmode: None,
            transition: Some(Transition { duration: 500 }),
            annotations: empty_annotations(empty),
        },
    }
}

pub fn stacked_bar_chart(title: &str, series: Vec<BarSeries>) -> Figure {
    let empty = series.iter().all(|group| group.x.is_empty());
    let data = series
        .into_iter()
        .map(|group| Trace {
            kind: TraceKind::Bar,
            name: Some(group.name),
            mode: None,
            x: group.x,
            y: group.y.into_iter().map(Some).collect(),
            text: Some(group.text),
            textposition: Some("auto"),
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: Title {
                text: title.to_string(),
            },
            barmode: Some("stack"),
            transition: None,
            annotations: empty_annotations(empty),
        },
    }
}

fn empty_annotations(empty: bool) -> Vec<Annotation> {
    if empty {
        vec![Annotation::centered(EMPTY_NOTICE)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::date;
    use serde_json::json;

    #[test]
    fn line_chart_serializes_for_plotly() {
        let figure = line_chart(
            "Daily cases",
            vec![date(2021, 3, 1), date(2021, 3, 2)],
            vec![None, Some(100.0)],
        );
        let value = serde_json::to_value(&figure).unwrap();
        assert_eq!(value["data"][0]["type"], "scatter");
        assert_eq!(value["data"][0]["mode"], "lines");
        assert_eq!(value["data"][0]["x"], json!(["2021-03-01", "2021-03-02"]));
        assert_eq!(value["data"][0]["y"], json!([null, 100.0]));
        assert_eq!(value["layout"]["title"]["text"], "Daily cases");
        assert!(value["layout"].get("annotations").is_none());
        assert!(value["data"][0].get("text").is_none());
    }

    #[test]
    fn bar_chart_stacks_series_with_text() {
        let figure = stacked_bar_chart(
            "Weekly",
            vec![BarSeries {
                name: "Regular".to_string(),
                x: vec![date(2021, 3, 7)],
                y: vec![600.0],
                text: vec![Some(100.0)],
            }],
        );
        let value = serde_json::to_value(&figure).unwrap();
        assert_eq!(value["layout"]["barmode"], "stack");
        assert_eq!(value["data"][0]["type"], "bar");
        assert_eq!(value["data"][0]["name"], "Regular");
        assert_eq!(value["data"][0]["text"], json!([100.0]));
        assert_eq!(value["data"][0]["textposition"], "auto");
    }

    #[test]
    fn empty_figures_carry_a_notice() {
        let figure = line_chart("Daily cases", Vec::new(), Vec::new());
        assert!(figure.is_empty());
        assert_eq!(figure.layout.annotations.len(), 1);
        assert_eq!(figure.layout.annotations[0].text, EMPTY_NOTICE);
    }
}
