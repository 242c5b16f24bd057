//! Chart-agnostic figure model handed to whatever draws the strips.

use crate::display::{stacked_traces, Trace, ViewSettings};
use crate::signal::Sample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

/// Strip colours, cycled by channel position.
pub const PALETTE: [Color; 6] = [
    Color(0x2563EB),
    Color(0xDC2626),
    Color(0x16A34A),
    Color(0x9333EA),
    Color(0xEA580C),
    Color(0x0891B2),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<LineSeries>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis {
                label: Some("Time (ms)".into()),
            },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: LineSeries) {
        self.series.push(series);
    }
}

/// Keep at most `max_points` evenly spaced points.
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

pub fn figure_from_traces(title: &str, traces: Vec<Trace>, max_points: usize) -> Figure {
    let mut fig = Figure::new(Some(title.to_string()));
    for (idx, trace) in traces.into_iter().enumerate() {
        fig.add_series(LineSeries {
            points: decimate_points(&trace.points, max_points),
            name: trace.channel,
            style: Style {
                width: 1.4,
                color: PALETTE[idx % PALETTE.len()],
            },
        });
    }
    fig
}

/// Stacked strips of the selected channels as a figure.
pub fn figure_from_recording<S: AsRef<str>>(
    title: &str,
    samples: &[Sample],
    channels: &[S],
    view: &ViewSettings,
    max_points: usize,
) -> Figure {
    figure_from_traces(title, stacked_traces(samples, channels, view), max_points)
}
