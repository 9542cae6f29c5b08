// src/viz/chart.rs

use chrono::Datelike;
use serde::Serialize;

use crate::viz::ConceptPoint;

/// The three overlapping display windows. `None` means no year cutoff.
pub const TIMEFRAMES: [(Option<i32>, &str); 3] = [
    (Some(5), "Last 5 Years"),
    (Some(10), "Last 10 Years"),
    (None, "All Time"),
];

/// The window shown when the chart first renders.
pub const DEFAULT_TIMEFRAME: &str = "Last 5 Years";

/// Plotly-compatible figure specification, serialized as-is to the caller.
#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: &'static str,
    pub marker: Marker,
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub template: &'static str,
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub hovermode: &'static str,
    pub margin: Margin,
    pub updatemenus: Vec<UpdateMenu>,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
}

#[derive(Debug, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Legend {
    pub title: AxisTitle,
}

#[derive(Debug, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub menu_type: &'static str,
    pub direction: &'static str,
    pub buttons: Vec<Button>,
    pub pad: Pad,
    pub showactive: bool,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Pad {
    pub r: u32,
    pub t: u32,
}

#[derive(Debug, Serialize)]
pub struct Button {
    pub label: String,
    pub method: &'static str,
    /// One update payload: the visibility mask over the figure's traces.
    pub args: [VisibleUpdate; 1],
}

#[derive(Debug, Serialize)]
pub struct VisibleUpdate {
    pub visible: Vec<bool>,
}

/// Points whose period-end year falls inside the trailing window.
pub fn filter_window<'a>(
    points: &'a [ConceptPoint],
    years: Option<i32>,
    current_year: i32,
) -> Vec<&'a ConceptPoint> {
    match years {
        Some(years) => {
            let cutoff = current_year - years;
            points.iter().filter(|p| p.end.year() >= cutoff).collect()
        }
        None => points.iter().collect(),
    }
}

/// Builds the interactive concept chart: one line+marker trace per window,
/// only the default window visible, and one button per window that shows it
/// and hides the other two.
pub fn build_concept_figure(points: &[ConceptPoint], concept: &str, current_year: i32) -> Figure {
    let mut data = Vec::with_capacity(TIMEFRAMES.len());
    for (years, name) in TIMEFRAMES {
        let filtered = filter_window(points, years, current_year);
        data.push(Trace {
            trace_type: "scatter",
            x: filtered
                .iter()
                .map(|p| p.end.format("%Y-%m-%d").to_string())
                .collect(),
            y: filtered.iter().map(|p| p.val).collect(),
            mode: "markers+lines",
            marker: Marker {
                size: 10,
                color: "green",
            },
            name: name.to_string(),
            visible: name == DEFAULT_TIMEFRAME,
        });
    }

    let buttons = TIMEFRAMES
        .iter()
        .map(|(_, name)| Button {
            label: name.to_string(),
            method: "update",
            args: [VisibleUpdate {
                visible: TIMEFRAMES.iter().map(|(_, other)| other == name).collect(),
            }],
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            template: "plotly_white",
            title: Title {
                text: format!("Time Series Plot for {} over Time", concept),
                x: 0.5,
            },
            xaxis: Axis {
                title: AxisTitle {
                    text: "Date".to_string(),
                },
            },
            yaxis: Axis {
                title: AxisTitle {
                    text: concept.to_string(),
                },
            },
            legend: Legend {
                title: AxisTitle {
                    text: "Time Frame".to_string(),
                },
            },
            hovermode: "closest",
            margin: Margin {
                l: 40,
                r: 40,
                t: 60,
                b: 40,
            },
            updatemenus: vec![UpdateMenu {
                menu_type: "buttons",
                direction: "down",
                buttons,
                pad: Pad { r: 10, t: 10 },
                showactive: true,
                x: 0.1,
                xanchor: "left",
                y: 1.1,
                yanchor: "top",
            }],
        },
    }
}
