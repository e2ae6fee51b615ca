use serde::Serialize;

use crate::math::stats::StatsHelper;
use crate::prelude::{SessionError, SessionResult};

/// Reference lines span this x range regardless of the axis limits.
const REFERENCE_LINE_X_MAX: f64 = 110.0;
const MIN_X_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub marker: Marker,
    pub color: String,
    /// `(measurement index, value)` pairs, 1-based index.
    pub points: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub color: String,
    pub style: LineStyle,
}

/// Scatter chart handed to the plotting collaborator for rasterization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub file_name: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: (f64, f64),
    pub series: Vec<ChartSeries>,
    pub reference_lines: Vec<ReferenceLine>,
    pub grid: bool,
    pub legend_frame: bool,
}

impl ChartRequest {
    pub fn from_void_fractions(file_name: impl Into<String>, voids: &[f64]) -> Self {
        let trace = StatsHelper::cumulative_means(voids);
        let last_mean = trace.last().copied().unwrap_or(0.0);

        let indexed = |values: &[f64]| -> Vec<(usize, f64)> {
            values
                .iter()
                .enumerate()
                .map(|(idx, &value)| (idx + 1, value))
                .collect()
        };

        Self {
            file_name: file_name.into(),
            x_label: "Count".into(),
            y_label: "α".into(),
            x_limits: (0.0, Self::x_max(voids.len()) as f64),
            series: vec![
                ChartSeries {
                    label: "Each α".into(),
                    marker: Marker::Circle,
                    color: "red".into(),
                    points: indexed(voids),
                },
                ChartSeries {
                    label: "Cumulative Mean α".into(),
                    marker: Marker::Cross,
                    color: "green".into(),
                    points: indexed(&trace),
                },
            ],
            reference_lines: vec![
                ReferenceLine {
                    label: "Cumulative Mean α ×0.99".into(),
                    value: last_mean * 0.99,
                    x_min: 0.0,
                    x_max: REFERENCE_LINE_X_MAX,
                    color: "blue".into(),
                    style: LineStyle::Solid,
                },
                ReferenceLine {
                    label: "Cumulative Mean α ×1.01".into(),
                    value: last_mean * 1.01,
                    x_min: 0.0,
                    x_max: REFERENCE_LINE_X_MAX,
                    color: "blue".into(),
                    style: LineStyle::Dashed,
                },
            ],
            grid: true,
            legend_frame: false,
        }
    }

    pub fn to_json(&self) -> SessionResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| SessionError::Export(err.to_string()))
    }

    /// 50 up to fifty readings, then the next multiple of ten above the count.
    fn x_max(count: usize) -> usize {
        if count <= MIN_X_LIMIT {
            MIN_X_LIMIT
        } else {
            (count / 10 + 1) * 10
        }
    }
}
