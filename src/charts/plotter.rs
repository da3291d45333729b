//! Chart Plotter Module
//! Builds the interactive bubble chart as a Plotly figure description.

use crate::data::{Record, Table};
use serde::Serialize;
use thiserror::Error;

/// Marker diameter per inhabitant. Must stay the same for every render.
pub const BUBBLE_SCALE: f64 = 0.5e-5;
/// Opacity of the background bubbles.
pub const BASE_OPACITY: f64 = 0.3;

pub const TITLE: &str = "Demanda per cápita de papel y cartón vs. Uso de Internet";
pub const X_LABEL: &str = "Porcentaje de uso de internet";
pub const Y_LABEL: &str = "Demanda per cápita de papel y cartón en KG";
pub const BASE_NAME: &str = "All Countries (Population >= 5M)";

pub const HIGHLIGHT_COLOR: &str = "red";
pub const HIGHLIGHT_BORDER: &str = "DarkRed";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    #[error("Data not loaded or empty")]
    NoData,
}

/// Marker size for a country.
pub fn bubble_size(population: f64) -> f64 {
    population * BUBBLE_SCALE
}

/// Plotly figure: traces plus layout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Hover text.
    pub text: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub size: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<MarkerLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerLine {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub hovermode: &'static str,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub title: Title,
}

impl Trace {
    fn scatter(name: String, records: &[&Record], marker_style: impl Fn(Vec<f64>) -> Marker) -> Self {
        Self {
            kind: "scatter",
            mode: "markers",
            name,
            x: records.iter().map(|r| r.internet_usage_pct).collect(),
            y: records.iter().map(|r| r.demand_per_capita).collect(),
            text: records.iter().map(|r| r.country.clone()).collect(),
            marker: marker_style(records.iter().map(|r| bubble_size(r.population)).collect()),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: Title { text: TITLE },
            xaxis: Axis {
                title: Title { text: X_LABEL },
            },
            yaxis: Axis {
                title: Title { text: Y_LABEL },
            },
            hovermode: "closest",
            showlegend: true,
        }
    }
}

/// Creates the bubble chart figure from the country table.
pub struct ChartPlotter;

impl ChartPlotter {
    /// All countries as faint bubbles, plus the selected one highlighted.
    ///
    /// An empty, unknown or missing selection only yields the base trace.
    pub fn build_chart(table: Option<&Table>, selected: Option<&str>) -> Result<Figure, ChartError> {
        let table = table.filter(|t| !t.is_empty()).ok_or(ChartError::NoData)?;

        let all: Vec<&Record> = table.records().iter().collect();
        let mut data = vec![Trace::scatter(BASE_NAME.to_string(), &all, |size| Marker {
            size,
            opacity: Some(BASE_OPACITY),
            color: None,
            line: None,
        })];

        if let Some(record) = selected.filter(|s| !s.is_empty()).and_then(|s| table.find(s)) {
            data.push(Trace::scatter(record.country.clone(), &[record], |size| Marker {
                size,
                opacity: None,
                color: Some(HIGHLIGHT_COLOR),
                line: Some(MarkerLine {
                    width: 2.0,
                    color: HIGHLIGHT_BORDER,
                }),
            }));
        }

        Ok(Figure {
            data,
            layout: Layout::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record;

    fn table() -> Table {
        Table::new(vec![record("A", 10.0e6), record("B", 6.0e6)])
    }

    #[test]
    fn bubble_size_scales_population() {
        assert_eq!(bubble_size(10.0e6), 10.0e6 * 0.5e-5);
        assert_eq!(bubble_size(6.0e6), 6.0e6 * 0.5e-5);
    }

    #[test]
    fn selected_country_gets_highlight_trace() {
        let table = table();
        let figure = ChartPlotter::build_chart(Some(&table), Some("A")).unwrap();

        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].text, vec!["A", "B"]);
        assert_eq!(figure.data[0].marker.opacity, Some(BASE_OPACITY));
        assert_eq!(
            figure.data[0].marker.size,
            vec![bubble_size(10.0e6), bubble_size(6.0e6)]
        );

        let highlight = &figure.data[1];
        assert_eq!(highlight.name, "A");
        assert_eq!(highlight.text, vec!["A"]);
        assert_eq!(highlight.marker.size, vec![bubble_size(10.0e6)]);
        assert_eq!(highlight.marker.color, Some(HIGHLIGHT_COLOR));
        assert!(highlight.marker.line.is_some());
    }

    #[test]
    fn empty_or_unknown_selection_is_base_only() {
        let table = table();
        for selected in [None, Some(""), Some("Nonexistent"), Some("a")] {
            let figure = ChartPlotter::build_chart(Some(&table), selected).unwrap();
            assert_eq!(figure.data.len(), 1, "selection {selected:?}");
            assert_eq!(figure.data[0].name, BASE_NAME);
        }
    }

    #[test]
    fn no_data_is_an_error() {
        assert_eq!(
            ChartPlotter::build_chart(Some(&Table::default()), Some("A")),
            Err(ChartError::NoData)
        );
        assert_eq!(ChartPlotter::build_chart(None, None), Err(ChartError::NoData));
    }

    #[test]
    fn serializes_as_plotly_figure() {
        let table = table();
        let figure = ChartPlotter::build_chart(Some(&table), Some("B")).unwrap();
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "markers");
        assert_eq!(json["data"][0]["marker"]["opacity"], 0.3);
        assert!(json["data"][0]["marker"].get("color").is_none());
        assert_eq!(json["data"][1]["marker"]["line"]["color"], "DarkRed");
        assert_eq!(json["data"][1]["x"][0], 75.0);
        assert_eq!(json["data"][1]["y"][0], 40.0);
        assert_eq!(json["layout"]["hovermode"], "closest");
        assert_eq!(json["layout"]["showlegend"], true);
        assert_eq!(json["layout"]["title"]["text"], TITLE);
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], X_LABEL);
    }
}
