//! Read-only table presentation with virtual sorting.
//!
//! Sorting permutes row indices; the underlying [`Table`] is shared and
//! never modified.

use crate::constants::MAX_PAGE_SIZE;
use crate::types::{CellValue, ColumnKind, Table};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Sort direction requested by a column header click
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSort {
    /// Original row order
    #[default]
    Default,
    Ascending,
    Descending,
}

impl ColumnSort {
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "asc" | "ascending" => Some(ColumnSort::Ascending),
            "desc" | "descending" => Some(ColumnSort::Descending),
            "" | "none" | "default" => Some(ColumnSort::Default),
            _ => None,
        }
    }
}

/// Column header as shown above the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub name: String,
    pub kind: ColumnKind,
}

/// One page of display rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TablePage {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<Vec<String>>,
    /// Display index of the first returned row
    pub start: usize,
    pub total: usize,
    /// e.g. "1-50 of 1.2K"
    pub position: String,
    pub sort: Option<(usize, ColumnSort)>,
}

/// Sortable view over a shared table
#[derive(Clone, Debug)]
pub struct TableView {
    table: Arc<Table>,
    /// Sorted row indices (virtual sorting without modifying the table)
    sorted_indices: Vec<usize>,
    current_sort: Option<(usize, ColumnSort)>,
}

impl TableView {
    pub fn new(table: Arc<Table>) -> Self {
        let sorted_indices = (0..table.row_count()).collect();
        Self {
            table,
            sorted_indices,
            current_sort: None,
        }
    }

    pub fn current_sort(&self) -> Option<(usize, ColumnSort)> {
        self.current_sort
    }

    /// Get the actual row index after sorting
    pub fn actual_row_index(&self, display_row: usize) -> usize {
        self.sorted_indices
            .get(display_row)
            .copied()
            .unwrap_or(display_row)
    }

    /// Sort rows by the given column; out-of-range columns reset the order
    pub fn sort(&mut self, col_ix: usize, sort: ColumnSort) {
        self.sorted_indices = (0..self.table.row_count()).collect();

        if matches!(sort, ColumnSort::Default) || col_ix >= self.table.column_count() {
            self.current_sort = None;
            return;
        }

        self.current_sort = Some((col_ix, sort));

        let table = &self.table;
        self.sorted_indices.sort_by(|&a, &b| {
            let cell_a = table.cell(a, col_ix).unwrap_or(CellValue::Empty);
            let cell_b = table.cell(b, col_ix).unwrap_or(CellValue::Empty);

            // Missing cells stay at the bottom in both directions
            match (cell_a.is_empty(), cell_b.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let cmp = compare_cells(&cell_a, &cell_b);
                    match sort {
                        ColumnSort::Descending => cmp.reverse(),
                        _ => cmp,
                    }
                }
            }
        });
    }

    /// Display strings for `count` rows starting at display row `start`
    pub fn page(&self, start: usize, count: usize) -> TablePage {
        let total = self.table.row_count();
        let count = count.min(MAX_PAGE_SIZE);
        let start = start.min(total);
        let end = (start + count).min(total);

        let rows = (start..end)
            .map(|display_row| {
                let row = self.actual_row_index(display_row);
                (0..self.table.column_count())
                    .map(|col| {
                        self.table
                            .cell(row, col)
                            .map(|c| c.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let columns = self
            .table
            .columns()
            .iter()
            .map(|c| ColumnHeader {
                name: c.name.clone(),
                kind: c.kind(),
            })
            .collect();

        TablePage {
            columns,
            rows,
            start,
            total,
            position: format_position(start, end, total),
            sort: self.current_sort,
        }
    }
}

fn compare_cells(a: &CellValue<'_>, b: &CellValue<'_>) -> Ordering {
    match (a, b) {
        (CellValue::Number(na), CellValue::Number(nb)) => {
            na.partial_cmp(nb).unwrap_or(Ordering::Equal)
        }
        (CellValue::Text(ta), CellValue::Text(tb)) => ta.to_lowercase().cmp(&tb.to_lowercase()),
        (CellValue::Temporal(da), CellValue::Temporal(db)) => da.cmp(db),
        (a, b) => a.to_string().cmp(&b.to_string()),
    }
}

/// Format row count for display (e.g., "1.2M rows")
pub fn format_row_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M rows", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K rows", count as f64 / 1_000.0)
    } else {
        format!("{} rows", count)
    }
}

/// Format current position for display (e.g., "1-50 of 1.2K")
pub fn format_position(start: usize, end: usize, total: usize) -> String {
    if total == 0 || end <= start {
        return format!("0 of {}", total);
    }

    let display_start = start + 1; // 1-indexed for users
    let display_end = end.min(total);

    if total >= 1_000_000 {
        format!(
            "{}-{} of {:.1}M",
            display_start,
            display_end,
            total as f64 / 1_000_000.0
        )
    } else if total >= 1_000 {
        format!(
            "{}-{} of {:.1}K",
            display_start,
            display_end,
            total as f64 / 1_000.0
        )
    } else {
        format!("{}-{} of {}", display_start, display_end, total)
    }
}
