//! SVG rendering of a [`Figure`] with plotters
//!
//! 3D scenes map data x to the plotters x axis, data z to the vertical axis
//! and data y to the depth axis.

use crate::chart::error::{ChartError, ChartResult};
use crate::chart::figure::{AxisScale, Figure, Surface, TraceMode};
use crate::constants::{
    AXIS_PADDING, CAMERA_PITCH, CAMERA_SCALE, CAMERA_YAW, CHART_FONT, COLOR_BAR_WIDTH, COLOR_SCALE,
    LABEL_FONT_SIZE, LINE_WIDTH, MARKER_RADIUS, SERIES_COLORS, TITLE_FONT_SIZE,
};
use crate::types::{ChartKind, ChartSpec};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::time::Instant;

type DrawOutcome = Result<(), Box<dyn std::error::Error>>;

/// A figure together with its rendered SVG
///
/// Export serializes `svg`; it never rebuilds from `spec`.
#[derive(Clone, Debug)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub figure: Figure,
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

impl RenderedChart {
    pub fn render(spec: ChartSpec, figure: Figure, width: u32, height: u32) -> ChartResult<Self> {
        let svg = render_svg(&figure, width, height)?;
        Ok(Self {
            spec,
            figure,
            svg,
            width,
            height,
        })
    }

    pub fn title(&self) -> &str {
        &self.figure.layout.title
    }
}

/// Draw `figure` into an SVG document of the given pixel size
pub fn render_svg(figure: &Figure, width: u32, height: u32) -> ChartResult<String> {
    let start = Instant::now();
    let mut svg = String::new();

    let result = match figure.kind {
        ChartKind::Line2D | ChartKind::Scatter2D => draw_2d(figure, &mut svg, (width, height)),
        ChartKind::Scatter3D | ChartKind::Surface3D => draw_3d(figure, &mut svg, (width, height)),
    };
    result.map_err(|e| ChartError::Render(e.to_string()))?;

    tracing::debug!(
        kind = figure.kind.label(),
        bytes = svg.len(),
        "Rendered chart in {:?}",
        start.elapsed()
    );
    Ok(svg)
}

fn draw_2d(figure: &Figure, svg: &mut String, size: (u32, u32)) -> DrawOutcome {
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, bar_area) = split_for_color_bar(&root, figure.color_range.is_some(), size.0);

    let x_range = padded_range(figure.traces.iter().flat_map(|t| t.x.iter().copied()));
    let y_range = padded_range(figure.traces.iter().flat_map(|t| t.y.iter().copied()));

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&figure.layout.title, (CHART_FONT, TITLE_FONT_SIZE))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(x_range, y_range)?;

    let x_fmt = |v: &f64| figure.x_scale.format_tick(*v);
    let y_fmt = |v: &f64| figure.y_scale.format_tick(*v);
    chart
        .configure_mesh()
        .x_labels(figure.x_scale.preferred_ticks())
        .y_labels(figure.y_scale.preferred_ticks())
        .x_desc(figure.layout.x_title.as_str())
        .y_desc(figure.layout.y_title.as_str())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .axis_desc_style((CHART_FONT, LABEL_FONT_SIZE))
        .draw()?;

    for trace in &figure.traces {
        let color = series_color(trace.color_index);
        let points: Vec<(f64, f64)> = trace.x.iter().copied().zip(trace.y.iter().copied()).collect();

        let anno = match (trace.mode, &trace.color_values, figure.color_range) {
            (TraceMode::Lines, _, _) => {
                chart.draw_series(LineSeries::new(points, color.stroke_width(LINE_WIDTH)))?
            }
            (TraceMode::Markers, Some(values), Some(range)) => chart.draw_series(
                points
                    .iter()
                    .zip(values)
                    .map(|(&p, &v)| Circle::new(p, MARKER_RADIUS, scale_color(v, range).filled())),
            )?,
            (TraceMode::Markers, _, _) => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, MARKER_RADIUS, color.filled())),
            )?,
        };

        if let Some(name) = &trace.name {
            anno.label(name.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled())
            });
        }
    }

    if figure.layout.show_legend && figure.has_legend_entries() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((CHART_FONT, LABEL_FONT_SIZE))
            .draw()?;
    }

    if let (Some(area), Some(range)) = (bar_area, figure.color_range) {
        draw_color_bar(&area, range)?;
    }

    root.present()?;
    Ok(())
}

fn draw_3d(figure: &Figure, svg: &mut String, size: (u32, u32)) -> DrawOutcome {
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;

    // Surfaces are always colored by height
    let color_range = figure
        .color_range
        .or_else(|| figure.surface.as_ref().and_then(surface_range));
    let (plot_area, bar_area) = split_for_color_bar(&root, color_range.is_some(), size.0);

    let (x_range, y_range, z_range) = match &figure.surface {
        Some(surface) => (
            padded_range(surface.x.iter().copied()),
            padded_range(surface.y.iter().copied()),
            padded_range(surface.z.iter().flatten().copied()),
        ),
        None => (
            padded_range(figure.traces.iter().flat_map(|t| t.x.iter().copied())),
            padded_range(figure.traces.iter().flat_map(|t| t.y.iter().copied())),
            padded_range(
                figure
                    .traces
                    .iter()
                    .flat_map(|t| t.z.iter().flatten().copied()),
            ),
        ),
    };

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&figure.layout.title, (CHART_FONT, TITLE_FONT_SIZE))
        .margin(16)
        .build_cartesian_3d(x_range.clone(), z_range.clone(), y_range.clone())?;

    chart.with_projection(|mut pb| {
        pb.yaw = CAMERA_YAW;
        pb.pitch = CAMERA_PITCH;
        pb.scale = CAMERA_SCALE;
        pb.into_matrix()
    });

    let x_fmt = |v: &f64| figure.x_scale.format_tick(*v);
    let vertical_fmt = |v: &f64| figure.z_scale.format_tick(*v);
    let depth_fmt = |v: &f64| figure.y_scale.format_tick(*v);
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .x_formatter(&x_fmt)
        .y_formatter(&vertical_fmt)
        .z_formatter(&depth_fmt)
        .draw()?;

    if let Some(scene) = &figure.layout.scene {
        let style = (CHART_FONT, LABEL_FONT_SIZE).into_font();
        chart.draw_series([
            Text::new(
                scene.x_title.clone(),
                (x_range.end, z_range.start, y_range.start),
                style.clone(),
            ),
            Text::new(
                scene.z_title.clone(),
                (x_range.start, z_range.end, y_range.start),
                style.clone(),
            ),
            Text::new(
                scene.y_title.clone(),
                (x_range.start, z_range.start, y_range.end),
                style,
            ),
        ])?;
    }

    match &figure.surface {
        Some(surface) => {
            let range = color_range.unwrap_or((0.0, 1.0));
            let cells = surface_cells(surface, range);
            if cells.is_empty() {
                // Single row or column: no quads to draw
                chart.draw_series(surface_points(surface).into_iter().map(|(p, z)| {
                    Circle::new(p, MARKER_RADIUS, scale_color(z, range).filled())
                }))?;
            } else {
                chart.draw_series(cells)?;
            }
        }
        None => {
            for trace in &figure.traces {
                let color = series_color(trace.color_index);
                let depth = trace.z.as_deref().unwrap_or(&[]);
                let points: Vec<(f64, f64, f64)> = trace
                    .x
                    .iter()
                    .zip(&trace.y)
                    .zip(depth)
                    .map(|((&x, &y), &z)| (x, z, y))
                    .collect();

                let anno = match (&trace.color_values, color_range) {
                    (Some(values), Some(range)) => chart.draw_series(
                        points.iter().zip(values).map(|(&p, &v)| {
                            Circle::new(p, MARKER_RADIUS, scale_color(v, range).filled())
                        }),
                    )?,
                    _ => chart.draw_series(
                        points
                            .iter()
                            .map(|&p| Circle::new(p, MARKER_RADIUS, color.filled())),
                    )?,
                };

                if let Some(name) = &trace.name {
                    anno.label(name.as_str()).legend(move |(x, y)| {
                        Circle::new((x + 6, y), MARKER_RADIUS, color.filled())
                    });
                }
            }

            if figure.layout.show_legend && figure.has_legend_entries() {
                chart
                    .configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .label_font((CHART_FONT, LABEL_FONT_SIZE))
                    .draw()?;
            }
        }
    }

    if let (Some(area), Some(range)) = (bar_area, color_range) {
        draw_color_bar(&area, range)?;
    }

    root.present()?;
    Ok(())
}

/// One colored quad per grid cell; cells touching a hole are skipped
fn surface_cells(surface: &Surface, range: (f64, f64)) -> Vec<Polygon<(f64, f64, f64)>> {
    let mut cells = Vec::new();
    for row in 0..surface.y.len().saturating_sub(1) {
        for col in 0..surface.x.len().saturating_sub(1) {
            let corners = [(col, row), (col + 1, row), (col + 1, row + 1), (col, row + 1)];
            let heights: Vec<f64> = corners.iter().map(|&(c, r)| surface.z[r][c]).collect();
            if heights.iter().any(|z| !z.is_finite()) {
                continue;
            }

            let mean = heights.iter().sum::<f64>() / heights.len() as f64;
            let points: Vec<(f64, f64, f64)> = corners
                .iter()
                .zip(&heights)
                .map(|(&(c, r), &z)| (surface.x[c], z, surface.y[r]))
                .collect();
            cells.push(Polygon::new(points, scale_color(mean, range).mix(0.9).filled()));
        }
    }
    cells
}

fn surface_points(surface: &Surface) -> Vec<((f64, f64, f64), f64)> {
    let mut points = Vec::new();
    for (r, row) in surface.z.iter().enumerate() {
        for (c, &z) in row.iter().enumerate() {
            if z.is_finite() {
                points.push(((surface.x[c], z, surface.y[r]), z));
            }
        }
    }
    points
}

fn surface_range(surface: &Surface) -> Option<(f64, f64)> {
    let mut values = surface.z.iter().flatten().copied().filter(|v| v.is_finite());
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

fn split_for_color_bar<'a>(
    root: &DrawingArea<SVGBackend<'a>, Shift>,
    with_bar: bool,
    width: u32,
) -> (
    DrawingArea<SVGBackend<'a>, Shift>,
    Option<DrawingArea<SVGBackend<'a>, Shift>>,
) {
    if !with_bar {
        return (root.clone(), None);
    }
    let (plot, bar) = root.split_horizontally(width as i32 - COLOR_BAR_WIDTH);
    (plot, Some(bar))
}

fn draw_color_bar(area: &DrawingArea<SVGBackend<'_>, Shift>, (lo, hi): (f64, f64)) -> DrawOutcome {
    const STEPS: i32 = 64;
    let (_, height) = area.dim_in_pixel();
    let top = 60;
    let bottom = (height as i32 - 60).max(top + STEPS);
    let left = 12;
    let right = left + 18;
    let span = bottom - top;

    for i in 0..STEPS {
        let y0 = top + span * i / STEPS;
        let y1 = top + span * (i + 1) / STEPS;
        // Top of the bar is the high end
        let t = 1.0 - (f64::from(i) + 0.5) / f64::from(STEPS);
        let value = lo + (hi - lo) * t;
        area.draw(&Rectangle::new(
            [(left, y0), (right, y1)],
            scale_color(value, (lo, hi)).filled(),
        ))?;
    }

    let style = (CHART_FONT, LABEL_FONT_SIZE).into_font();
    let labels = AxisScale::Numeric;
    area.draw(&Text::new(labels.format_tick(hi), (right + 4, top), style.clone()))?;
    area.draw(&Text::new(
        labels.format_tick(lo),
        (right + 4, bottom - LABEL_FONT_SIZE as i32),
        style,
    ))?;
    Ok(())
}

fn series_color(index: usize) -> RGBColor {
    let (r, g, b) = SERIES_COLORS[index % SERIES_COLORS.len()];
    RGBColor(r, g, b)
}

/// Interpolate the continuous color scale at `value` within `range`
fn scale_color(value: f64, (lo, hi): (f64, f64)) -> RGBColor {
    let t = if hi > lo && value.is_finite() {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let segments = (COLOR_SCALE.len() - 1) as f64;
    let position = t * segments;
    let ix = (position.floor() as usize).min(COLOR_SCALE.len() - 2);
    let frac = position - ix as f64;

    let (r0, g0, b0) = COLOR_SCALE[ix];
    let (r1, g1, b1) = COLOR_SCALE[ix + 1];
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Finite min..max widened by the axis padding; degenerate spans get ±1
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let mut finite = values.filter(|v| v.is_finite());
    let Some(first) = finite.next() else {
        return 0.0..1.0;
    };
    let (lo, hi) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo <= f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * AXIS_PADDING;
    (lo - pad)..(hi + pad)
}
