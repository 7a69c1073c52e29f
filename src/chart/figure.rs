//! Renderer-independent chart model
//!
//! A [`Figure`] holds resolved numeric coordinates plus enough metadata to
//! label axes. Temporal values are stored as seconds since the Unix epoch,
//! categorical values as their index in [`AxisScale::Categorical`].

use crate::types::{ChartKind, ChartSpec};
use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Serialize;

/// How numeric coordinates map back to tick labels
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AxisScale {
    Numeric,
    Temporal,
    Categorical { categories: Vec<String> },
}

impl AxisScale {
    pub fn format_tick(&self, value: f64) -> String {
        match self {
            AxisScale::Numeric => format_number(value),
            AxisScale::Temporal => match seconds_to_datetime(value) {
                Some(t) if t.num_seconds_from_midnight() == 0 => t.format("%Y-%m-%d").to_string(),
                Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
                None => String::new(),
            },
            AxisScale::Categorical { categories } => {
                let rounded = value.round();
                if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                categories
                    .get(rounded as usize)
                    .cloned()
                    .unwrap_or_default()
            }
        }
    }

    /// Number of tick labels worth requesting from the renderer
    pub fn preferred_ticks(&self) -> usize {
        match self {
            AxisScale::Categorical { categories } => categories.len().clamp(1, 20),
            _ => 10,
        }
    }
}

/// Drawing mode of a point trace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

/// One series of points
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    /// Legend entry; `None` for an ungrouped series
    pub name: Option<String>,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Present only for 3D scatter traces
    pub z: Option<Vec<f64>>,
    /// Per-point values for a continuous color scale
    pub color_values: Option<Vec<f64>>,
    /// Index into the series palette
    pub color_index: usize,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Z values on a rectangular grid, `z[row][col]` with rows along y
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Surface {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

/// Axis titles of a 3D scene
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SceneTitles {
    pub x_title: String,
    pub y_title: String,
    pub z_title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub scene: Option<SceneTitles>,
    pub show_legend: bool,
}

/// Chart object produced by the builder and consumed by the renderer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub traces: Vec<Trace>,
    pub surface: Option<Surface>,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub z_scale: AxisScale,
    /// Min/max of the continuous color scale, when one is used
    pub color_range: Option<(f64, f64)>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(kind: ChartKind, x_scale: AxisScale, y_scale: AxisScale) -> Self {
        Self {
            kind,
            traces: Vec::new(),
            surface: None,
            x_scale,
            y_scale,
            z_scale: AxisScale::Numeric,
            color_range: None,
            layout: Layout {
                title: String::new(),
                x_title: String::new(),
                y_title: String::new(),
                scene: None,
                show_legend: true,
            },
        }
    }

    /// Apply title, axis labels and legend visibility from the spec
    ///
    /// 3D charts put their labels on the scene; 2D charts on the x/y axes.
    pub fn apply_labels(&mut self, spec: &ChartSpec) {
        self.layout.title = spec.resolved_title();
        self.layout.x_title = spec.resolved_x_label();
        self.layout.y_title = spec.resolved_y_label();
        self.layout.show_legend = spec.show_legend;
        self.layout.scene = spec.kind.is_3d().then(|| SceneTitles {
            x_title: spec.resolved_x_label(),
            y_title: spec.resolved_y_label(),
            z_title: spec.resolved_z_label(),
        });
    }

    /// Total number of plotted points (grid cells for surfaces)
    pub fn point_count(&self) -> usize {
        let traces: usize = self.traces.iter().map(Trace::len).sum();
        let surface = self
            .surface
            .as_ref()
            .map(|s| s.x.len() * s.y.len())
            .unwrap_or(0);
        traces + surface
    }

    pub fn has_legend_entries(&self) -> bool {
        self.traces.iter().any(|t| t.name.is_some())
    }
}

pub(crate) fn datetime_to_seconds(t: &NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64 / 1000.0
}

fn seconds_to_datetime(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64).map(|t| t.naive_utc())
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e6 || magnitude < 1e-3 {
        format!("{:.2e}", value)
    } else if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
