//! Core types shared by the importer, table viewer and chart builder.
//!
//! The table model is columnar: every column carries one tagged vector whose
//! variant is decided once, at parse time, from the whole column.

use crate::constants::{DEFAULT_DELIMITER, DEFAULT_EXPORT_STEM, DEFAULT_Z_LABEL};
use crate::data::error::{DataError, DataResult};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Table Types
// ============================================================================

/// The single parsed dataset of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, checking that columns are equally long and uniquely named.
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != row_count {
                return Err(DataError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DataError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Cell at (row, column index), `None` when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> Option<CellValue<'_>> {
        self.columns.get(col).and_then(|c| c.get(row))
    }
}

/// A named, typed column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Option<CellValue<'_>> {
        self.data.get(row)
    }
}

/// Column values, one variant per inferred column type
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Temporal(_) => ColumnKind::Temporal,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row`; `Some(CellValue::Empty)` for a missing value inside bounds
    pub fn get(&self, row: usize) -> Option<CellValue<'_>> {
        let cell = match self {
            ColumnData::Numeric(v) => v.get(row).copied()?.map(CellValue::Number),
            ColumnData::Text(v) => v.get(row)?.as_deref().map(CellValue::Text),
            ColumnData::Temporal(v) => v.get(row).copied()?.map(CellValue::Temporal),
        };
        Some(cell.unwrap_or(CellValue::Empty))
    }
}

/// Inferred type of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "Numeric",
            ColumnKind::Text => "Text",
            ColumnKind::Temporal => "Temporal",
        }
    }
}

/// A borrowed view of a single cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
    Temporal(NaiveDateTime),
    Empty,
}

impl CellValue<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Present and, for numbers, finite
    pub fn is_plottable(&self) -> bool {
        match self {
            CellValue::Number(n) => n.is_finite(),
            CellValue::Empty => false,
            _ => true,
        }
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => {
                // No trailing zeros for whole numbers
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => f.write_str(s),
            CellValue::Temporal(t) => {
                if t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0 {
                    write!(f, "{}", t.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Empty => Ok(()),
        }
    }
}

// ============================================================================
// Import Types
// ============================================================================

/// An uploaded file, owned by the importer for one parse attempt
#[derive(Clone, Debug)]
pub struct RawUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RawUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// How row 0 (after skipped rows) is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Guess from the content
    #[default]
    Infer,
    /// Row 0 holds the column names
    FirstRowIsHeader,
    /// Every row is data; names are synthesized
    NoHeader,
}

impl HeaderMode {
    pub fn label(&self) -> &'static str {
        match self {
            HeaderMode::Infer => "Guess",
            HeaderMode::FirstRowIsHeader => "Yes (use row 0)",
            HeaderMode::NoHeader => "No (data from row 0)",
        }
    }

    /// Parse the short form used in query strings
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "infer" => Some(HeaderMode::Infer),
            "first_row" | "first_row_is_header" | "yes" => Some(HeaderMode::FirstRowIsHeader),
            "none" | "no_header" | "no" => Some(HeaderMode::NoHeader),
            _ => None,
        }
    }

    pub fn all() -> &'static [HeaderMode] {
        &[
            HeaderMode::Infer,
            HeaderMode::FirstRowIsHeader,
            HeaderMode::NoHeader,
        ]
    }
}

/// User-chosen parse configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Field separator; `\t` stands for a tab
    pub delimiter: String,
    /// Lines skipped before header/data interpretation
    pub skip_rows: usize,
    pub header_mode: HeaderMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            skip_rows: 0,
            header_mode: HeaderMode::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_header_mode(mut self, header_mode: HeaderMode) -> Self {
        self.header_mode = header_mode;
        self
    }
}

// ============================================================================
// Chart Types
// ============================================================================

/// Types of charts available
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    #[serde(rename = "line2d")]
    Line2D,
    #[serde(rename = "scatter2d")]
    Scatter2D,
    #[serde(rename = "scatter3d")]
    Scatter3D,
    #[serde(rename = "surface3d")]
    Surface3D,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line2D => "Line 2D",
            ChartKind::Scatter2D => "Scatter 2D",
            ChartKind::Scatter3D => "Scatter 3D",
            ChartKind::Surface3D => "Surface 3D",
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, ChartKind::Scatter3D | ChartKind::Surface3D)
    }

    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Line2D,
            ChartKind::Scatter2D,
            ChartKind::Scatter3D,
            ChartKind::Surface3D,
        ]
    }
}

/// Column names mapped to chart axes
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMapping {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub z: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Free-text axis titles; empty strings resolve to the mapped column names
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
    pub z: String,
}

/// Chart configuration
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub mapping: AxisMapping,
    /// Chart title; empty resolves to `"<y> vs <x>"`
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub axis_labels: AxisLabels,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
}

fn default_show_legend() -> bool {
    true
}

impl ChartSpec {
    pub fn new(kind: ChartKind, mapping: AxisMapping) -> Self {
        Self {
            kind,
            mapping,
            title: String::new(),
            axis_labels: AxisLabels::default(),
            show_legend: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_labels(mut self, labels: AxisLabels) -> Self {
        self.axis_labels = labels;
        self
    }

    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.mapping.color = color;
        self
    }

    pub fn resolved_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("{} vs {}", self.mapping.y, self.mapping.x)
        } else {
            self.title.clone()
        }
    }

    pub fn resolved_x_label(&self) -> String {
        non_empty_or(&self.axis_labels.x, &self.mapping.x)
    }

    pub fn resolved_y_label(&self) -> String {
        non_empty_or(&self.axis_labels.y, &self.mapping.y)
    }

    pub fn resolved_z_label(&self) -> String {
        let fallback = self.mapping.z.as_deref().unwrap_or(DEFAULT_Z_LABEL);
        non_empty_or(&self.axis_labels.z, fallback)
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

// ============================================================================
// Export Types
// ============================================================================

/// Image formats offered for export
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    pub fn from_extension(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn all() -> &'static [ImageFormat] {
        &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Svg]
    }
}

/// One export request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSpec {
    pub format: ImageFormat,
    #[serde(default)]
    pub file_name: String,
}

impl ExportSpec {
    pub fn new(format: ImageFormat, file_name: impl Into<String>) -> Self {
        Self {
            format,
            file_name: file_name.into(),
        }
    }

    /// Full download name, falling back to the chart title when no name was given
    pub fn download_name(&self, chart_title: &str) -> String {
        let stem = if self.file_name.trim().is_empty() {
            chart_title.trim().replace(' ', "_")
        } else {
            self.file_name.trim().to_string()
        };
        let stem = if stem.is_empty() {
            DEFAULT_EXPORT_STEM.to_string()
        } else {
            stem
        };
        format!("{}.{}", stem, self.format.extension())
    }
}
