//! Reshape (x, y, z) triples into a rectangular grid for surface charts
//!
//! Distinct x values become grid columns and distinct y values grid rows,
//! both sorted ascending. Every (x, y) pair must occur exactly once.

use crate::chart::error::{ChartError, ChartResult, PivotError};
use crate::chart::figure::{AxisScale, datetime_to_seconds};
use crate::types::{CellValue, Column, ColumnData, Table};
use serde::Serialize;
use std::collections::HashMap;

/// Surface grid; `z[row][col]` with `row` indexing `y_labels`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PivotGrid {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub x_coords: Vec<f64>,
    pub y_coords: Vec<f64>,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub z: Vec<Vec<f64>>,
}

impl PivotGrid {
    /// (distinct y count, distinct x count)
    pub fn shape(&self) -> (usize, usize) {
        (self.y_labels.len(), self.x_labels.len())
    }
}

struct GridAxis {
    labels: Vec<String>,
    coords: Vec<f64>,
    scale: AxisScale,
    index: HashMap<String, usize>,
}

/// Pivot `z` over the distinct values of `x` and `y`
///
/// Rows with a missing or non-finite x or y are ignored. A missing z for a
/// present pair is kept as NaN and leaves a hole in the surface.
pub fn pivot(table: &Table, x: &str, y: &str, z: &str) -> ChartResult<PivotGrid> {
    let x_col = lookup(table, x)?;
    let y_col = lookup(table, y)?;
    let z_col = lookup(table, z)?;

    let ColumnData::Numeric(z_values) = &z_col.data else {
        return Err(ChartError::NonNumericAxis {
            column: z.to_string(),
            axis: "z",
            chart: "Surface 3D",
            kind: z_col.kind().label(),
        });
    };

    let rows: Vec<usize> = (0..table.row_count())
        .filter(|&row| present(x_col, row) && present(y_col, row))
        .collect();
    if rows.is_empty() {
        return Err(ChartError::NoPlottableRows);
    }

    let x_axis = grid_axis(x_col, &rows);
    let y_axis = grid_axis(y_col, &rows);

    let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; x_axis.labels.len()]; y_axis.labels.len()];
    for &row in &rows {
        let x_label = label(x_col, row);
        let y_label = label(y_col, row);
        let (Some(&col_ix), Some(&row_ix)) = (x_axis.index.get(&x_label), y_axis.index.get(&y_label))
        else {
            continue;
        };

        let cell = &mut cells[row_ix][col_ix];
        if cell.is_some() {
            return Err(PivotError::Duplicate {
                x: x_label,
                y: y_label,
            }
            .into());
        }
        *cell = Some(
            z_values
                .get(row)
                .copied()
                .flatten()
                .filter(|v| v.is_finite())
                .unwrap_or(f64::NAN),
        );
    }

    let mut grid = Vec::with_capacity(cells.len());
    for (row_ix, row) in cells.into_iter().enumerate() {
        let mut values = Vec::with_capacity(row.len());
        for (col_ix, cell) in row.into_iter().enumerate() {
            match cell {
                Some(v) => values.push(v),
                None => {
                    return Err(PivotError::Missing {
                        x: x_axis.labels[col_ix].clone(),
                        y: y_axis.labels[row_ix].clone(),
                    }
                    .into());
                }
            }
        }
        grid.push(values);
    }

    Ok(PivotGrid {
        x_labels: x_axis.labels,
        y_labels: y_axis.labels,
        x_coords: x_axis.coords,
        y_coords: y_axis.coords,
        x_scale: x_axis.scale,
        y_scale: y_axis.scale,
        z: grid,
    })
}

fn lookup<'a>(table: &'a Table, name: &str) -> ChartResult<&'a Column> {
    table
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

fn present(column: &Column, row: usize) -> bool {
    column.get(row).is_some_and(|c| c.is_plottable())
}

fn label(column: &Column, row: usize) -> String {
    column
        .get(row)
        .unwrap_or(CellValue::Empty)
        .to_string()
}

fn grid_axis(column: &Column, rows: &[usize]) -> GridAxis {
    let (labels, coords, scale) = match &column.data {
        ColumnData::Numeric(values) => {
            let mut distinct: Vec<f64> = rows
                .iter()
                .filter_map(|&r| values[r])
                .filter(|v| v.is_finite())
                .collect();
            distinct.sort_by(f64::total_cmp);
            distinct.dedup();
            let labels = distinct
                .iter()
                .map(|&v| CellValue::Number(v).to_string())
                .collect();
            (labels, distinct, AxisScale::Numeric)
        }
        ColumnData::Temporal(values) => {
            let mut distinct: Vec<_> = rows.iter().filter_map(|&r| values[r]).collect();
            distinct.sort();
            distinct.dedup();
            let labels = distinct
                .iter()
                .map(|&t| CellValue::Temporal(t).to_string())
                .collect();
            let coords = distinct.iter().map(datetime_to_seconds).collect();
            (labels, coords, AxisScale::Temporal)
        }
        ColumnData::Text(values) => {
            let mut distinct: Vec<String> = rows.iter().filter_map(|&r| values[r].clone()).collect();
            distinct.sort();
            distinct.dedup();
            let coords = (0..distinct.len()).map(|i| i as f64).collect();
            let scale = AxisScale::Categorical {
                categories: distinct.clone(),
            };
            (distinct, coords, scale)
        }
    };

    let index = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.clone(), i))
        .collect();

    GridAxis {
        labels,
        coords,
        scale,
        index,
    }
}
