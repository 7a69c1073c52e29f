//! Error types for chart construction, rendering and export
//!
//! None of these touch the session: only the current chart or export
//! action is aborted.

use thiserror::Error;

/// Errors that can occur while building or exporting a chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// Chart requested before any table was imported
    #[error("no table loaded: upload a file first")]
    NoTable,

    /// Mapping references a column the table does not have
    #[error("column '{0}' not found in the current table")]
    UnknownColumn(String),

    /// Column type cannot be placed on the requested axis
    #[error("column '{column}' is {kind} but the {axis} axis of a {chart} chart needs numeric or temporal values")]
    NonNumericAxis {
        column: String,
        axis: &'static str,
        chart: &'static str,
        kind: &'static str,
    },

    /// Every row has a missing value in a mapped column
    #[error("no plottable rows: every row has a missing value in a mapped column")]
    NoPlottableRows,

    /// Surface pivot over non-rectangular data
    #[error("cannot build surface chart: {0}. Try Scatter 3D instead")]
    Pivot(#[from] PivotError),

    /// Export requested without a successfully rendered chart
    #[error("no chart to export")]
    NoChart,

    /// Charting engine failure
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// Serialization to an image failed
    #[error("export failed: {0}")]
    Export(String),
}

/// Why (x, y, z) triples could not be reshaped into a grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("duplicate entry for x = {x}, y = {y}")]
    Duplicate { x: String, y: String },

    #[error("missing entry for x = {x}, y = {y}")]
    Missing { x: String, y: String },
}

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

impl From<image::ImageError> for ChartError {
    fn from(e: image::ImageError) -> Self {
        ChartError::Export(e.to_string())
    }
}
