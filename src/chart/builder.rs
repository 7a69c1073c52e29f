//! Turns a table plus a [`ChartSpec`] into a [`Figure`]
//!
//! Column roles per chart kind:
//! - Line 2D / Scatter 2D: x may be any type (text becomes categorical),
//!   y must be numeric or temporal, color groups rows into traces.
//!   Scatter 2D with a numeric color column uses a continuous scale.
//! - Scatter 3D: x, y and z must be numeric or temporal.
//! - Surface 3D: x and y are pivoted into a grid of numeric z values.

use crate::chart::error::{ChartError, ChartResult};
use crate::chart::figure::{AxisScale, Figure, Surface, Trace, TraceMode, datetime_to_seconds};
use crate::chart::pivot::pivot;
use crate::types::{AxisMapping, CellValue, ChartKind, ChartSpec, Column, ColumnData, ColumnKind, Table};
use std::collections::HashMap;

/// Figure construction over one table
pub struct ChartBuilder<'a> {
    table: &'a Table,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// First column, or empty when the table has none
    pub fn default_x(&self) -> String {
        self.nth_or_first(0)
    }

    /// Second column, falling back to the first
    pub fn default_y(&self) -> String {
        self.nth_or_first(1)
    }

    /// Third column, falling back to the first
    pub fn default_z(&self) -> String {
        self.nth_or_first(2)
    }

    pub fn default_mapping(&self, kind: ChartKind) -> AxisMapping {
        AxisMapping {
            x: self.default_x(),
            y: self.default_y(),
            z: kind.is_3d().then(|| self.default_z()),
            color: None,
        }
    }

    pub fn default_spec(&self, kind: ChartKind) -> ChartSpec {
        ChartSpec::new(kind, self.default_mapping(kind))
    }

    /// Point every mapping at an existing column
    ///
    /// Called after a re-import or a chart kind change. Stale x/y/z fall back
    /// to their defaults, a 3D kind without z gets the default z, and a stale
    /// color mapping is dropped. Returns whether anything changed.
    pub fn revalidate(&self, spec: &mut ChartSpec) -> bool {
        if self.table.column_count() == 0 {
            return false;
        }

        let mut changed = false;
        let mapping = &mut spec.mapping;

        if !self.table.has_column(&mapping.x) {
            mapping.x = self.default_x();
            changed = true;
        }
        if !self.table.has_column(&mapping.y) {
            mapping.y = self.default_y();
            changed = true;
        }
        if spec.kind.is_3d() {
            let valid = mapping
                .z
                .as_deref()
                .is_some_and(|z| self.table.has_column(z));
            if !valid {
                mapping.z = Some(self.default_z());
                changed = true;
            }
        }
        if let Some(color) = &mapping.color
            && !self.table.has_column(color)
        {
            mapping.color = None;
            changed = true;
        }

        changed
    }

    /// Build the figure for `spec`
    pub fn build(&self, spec: &ChartSpec) -> ChartResult<Figure> {
        let mut figure = match spec.kind {
            ChartKind::Line2D | ChartKind::Scatter2D => self.build_2d(spec)?,
            ChartKind::Scatter3D => self.build_scatter_3d(spec)?,
            ChartKind::Surface3D => self.build_surface(spec)?,
        };

        if figure.point_count() == 0 {
            return Err(ChartError::NoPlottableRows);
        }

        figure.apply_labels(spec);
        tracing::debug!(
            kind = spec.kind.label(),
            traces = figure.traces.len(),
            points = figure.point_count(),
            "Built figure"
        );
        Ok(figure)
    }

    fn build_2d(&self, spec: &ChartSpec) -> ChartResult<Figure> {
        let chart = spec.kind.label();
        let x_col = self.lookup(&spec.mapping.x)?;
        let y_col = self.lookup(&spec.mapping.y)?;
        let color_col = self.lookup_color(spec)?;

        let (x, x_scale) = axis_values(x_col, true, "x", chart)?;
        let (y, y_scale) = axis_values(y_col, false, "y", chart)?;

        let mut mapped = vec![x_col, y_col];
        mapped.extend(color_col);
        let rows = self.plottable_rows(&mapped);

        let mode = match spec.kind {
            ChartKind::Line2D => TraceMode::Lines,
            _ => TraceMode::Markers,
        };

        let mut figure = Figure::new(spec.kind, x_scale, y_scale);
        let coords = Coords { x: &x, y: &y, z: None };
        let continuous = spec.kind == ChartKind::Scatter2D;
        add_traces(&mut figure, &coords, &rows, color_col, mode, continuous);
        Ok(figure)
    }

    fn build_scatter_3d(&self, spec: &ChartSpec) -> ChartResult<Figure> {
        let chart = spec.kind.label();
        let z_name = spec.mapping.z.clone().unwrap_or_else(|| self.default_z());
        let x_col = self.lookup(&spec.mapping.x)?;
        let y_col = self.lookup(&spec.mapping.y)?;
        let z_col = self.lookup(&z_name)?;
        let color_col = self.lookup_color(spec)?;

        let (x, x_scale) = axis_values(x_col, false, "x", chart)?;
        let (y, y_scale) = axis_values(y_col, false, "y", chart)?;
        let (z, z_scale) = axis_values(z_col, false, "z", chart)?;

        let mut mapped = vec![x_col, y_col, z_col];
        mapped.extend(color_col);
        let rows = self.plottable_rows(&mapped);

        let mut figure = Figure::new(spec.kind, x_scale, y_scale);
        figure.z_scale = z_scale;
        let coords = Coords {
            x: &x,
            y: &y,
            z: Some(z.as_slice()),
        };
        add_traces(&mut figure, &coords, &rows, color_col, TraceMode::Markers, true);
        Ok(figure)
    }

    fn build_surface(&self, spec: &ChartSpec) -> ChartResult<Figure> {
        let z_name = spec.mapping.z.clone().unwrap_or_else(|| self.default_z());
        let grid = pivot(self.table, &spec.mapping.x, &spec.mapping.y, &z_name)?;

        let mut figure = Figure::new(spec.kind, grid.x_scale, grid.y_scale);
        figure.surface = Some(Surface {
            x: grid.x_coords,
            y: grid.y_coords,
            z: grid.z,
        });
        Ok(figure)
    }

    fn nth_or_first(&self, n: usize) -> String {
        let columns = self.table.columns();
        columns
            .get(n)
            .or(columns.first())
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, name: &str) -> ChartResult<&'a Column> {
        self.table
            .column(name)
            .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
    }

    fn lookup_color(&self, spec: &ChartSpec) -> ChartResult<Option<&'a Column>> {
        spec.mapping
            .color
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| self.lookup(c))
            .transpose()
    }

    /// Rows where every mapped column has a finite value
    fn plottable_rows(&self, mapped: &[&Column]) -> Vec<usize> {
        (0..self.table.row_count())
            .filter(|&row| {
                mapped
                    .iter()
                    .all(|c| c.get(row).is_some_and(|v| v.is_plottable()))
            })
            .collect()
    }
}

struct Coords<'v> {
    x: &'v [Option<f64>],
    y: &'v [Option<f64>],
    z: Option<&'v [Option<f64>]>,
}

impl Coords<'_> {
    fn trace(&self, name: Option<String>, mode: TraceMode, rows: &[usize], color_index: usize) -> Trace {
        let pick = |values: &[Option<f64>]| -> Vec<f64> {
            rows.iter()
                .map(|&r| values.get(r).copied().flatten().unwrap_or(f64::NAN))
                .collect()
        };
        Trace {
            name,
            mode,
            x: pick(self.x),
            y: pick(self.y),
            z: self.z.map(pick),
            color_values: None,
            color_index,
        }
    }
}

/// One trace, one trace per color group, or one trace on a color scale
fn add_traces(
    figure: &mut Figure,
    coords: &Coords<'_>,
    rows: &[usize],
    color_col: Option<&Column>,
    mode: TraceMode,
    allow_continuous: bool,
) {
    match color_col {
        None => figure.traces.push(coords.trace(None, mode, rows, 0)),
        Some(column) if allow_continuous && column.kind() == ColumnKind::Numeric => {
            let mut trace = coords.trace(None, mode, rows, 0);
            let values: Vec<f64> = rows.iter().map(|&r| number_at(column, r)).collect();
            figure.color_range = value_range(&values);
            trace.color_values = Some(values);
            figure.traces.push(trace);
        }
        Some(column) => {
            for (ix, (group, members)) in group_rows(column, rows).into_iter().enumerate() {
                figure
                    .traces
                    .push(coords.trace(Some(group), mode, &members, ix));
            }
        }
    }
}

/// Numeric coordinates for a column plus the scale that labels them
fn axis_values(
    column: &Column,
    allow_categorical: bool,
    axis: &'static str,
    chart: &'static str,
) -> ChartResult<(Vec<Option<f64>>, AxisScale)> {
    match &column.data {
        ColumnData::Numeric(values) => Ok((values.clone(), AxisScale::Numeric)),
        ColumnData::Temporal(values) => Ok((
            values
                .iter()
                .map(|v| v.as_ref().map(datetime_to_seconds))
                .collect(),
            AxisScale::Temporal,
        )),
        ColumnData::Text(values) if allow_categorical => {
            // Categories keep first-appearance order
            let mut categories: Vec<String> = Vec::new();
            let mut index: HashMap<&str, usize> = HashMap::new();
            let coords = values
                .iter()
                .map(|v| {
                    v.as_deref().map(|s| {
                        *index.entry(s).or_insert_with(|| {
                            categories.push(s.to_string());
                            categories.len() - 1
                        }) as f64
                    })
                })
                .collect();
            Ok((coords, AxisScale::Categorical { categories }))
        }
        ColumnData::Text(_) => Err(ChartError::NonNumericAxis {
            column: column.name.clone(),
            axis,
            chart,
            kind: column.kind().label(),
        }),
    }
}

/// Partition rows by the display value of `column`, in first-appearance order
fn group_rows(column: &Column, rows: &[usize]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for &row in rows {
        let key = column.get(row).unwrap_or(CellValue::Empty).to_string();
        let ix = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[ix].1.push(row);
    }

    groups
}

fn number_at(column: &Column, row: usize) -> f64 {
    match column.get(row) {
        Some(CellValue::Number(n)) => n,
        _ => f64::NAN,
    }
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    Some(finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}
