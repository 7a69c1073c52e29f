//! Application-wide constants.
//!
//! Centralizes defaults and layout values to keep magic numbers out of the
//! importer, chart and server code.

use std::time::Duration;

// ============================================================================
// Import Defaults
// ============================================================================

/// Default field separator
pub const DEFAULT_DELIMITER: &str = ",";

/// Separator substituted for multi-character delimiters before handing the
/// text to the CSV reader (ASCII unit separator)
pub const SUBSTITUTE_SEPARATOR: u8 = 0x1f;

/// Number of data rows inspected when guessing whether row 0 is a header
pub const HEADER_SNIFF_ROWS: usize = 20;

/// File extensions accepted by the importer
pub const IMPORTABLE_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Prefix for synthesized column names when the file has no header row
pub const SYNTHESIZED_COLUMN_PREFIX: &str = "Column_";

// ============================================================================
// Table Viewer
// ============================================================================

/// Default number of rows returned per table page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on rows returned per table page
pub const MAX_PAGE_SIZE: usize = 1_000;

// ============================================================================
// Chart Defaults
// ============================================================================

/// Default chart width in pixels
pub const DEFAULT_CHART_WIDTH: u32 = 960;

/// Default chart height in pixels
pub const DEFAULT_CHART_HEIGHT: u32 = 640;

/// Fallback label for the Z axis when no Z column is mapped
pub const DEFAULT_Z_LABEL: &str = "Z";

/// Fallback export file stem
pub const DEFAULT_EXPORT_STEM: &str = "chart";

/// Font family used for every chart text element
pub const CHART_FONT: &str = "sans-serif";

/// Chart title font size
pub const TITLE_FONT_SIZE: u32 = 22;

/// Axis label font size
pub const LABEL_FONT_SIZE: u32 = 14;

/// Marker radius for scatter points, in pixels
pub const MARKER_RADIUS: i32 = 3;

/// Line width for line traces, in pixels
pub const LINE_WIDTH: u32 = 2;

/// Fraction of the data span added on each side of an axis range
pub const AXIS_PADDING: f64 = 0.05;

/// Chart series palette (RGB), cycled for grouped traces
pub const SERIES_COLORS: [(u8, u8, u8); 8] = [
    (31, 119, 180),  // Blue
    (255, 127, 14),  // Orange
    (44, 160, 44),   // Green
    (214, 39, 40),   // Red
    (148, 103, 189), // Purple
    (140, 86, 75),   // Brown
    (227, 119, 194), // Pink
    (23, 190, 207),  // Cyan
];

/// Continuous color scale stops, low to high (viridis)
pub const COLOR_SCALE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Width reserved on the right for the color bar, in pixels
pub const COLOR_BAR_WIDTH: i32 = 90;

/// 3D camera rotation around the vertical axis, in radians
pub const CAMERA_YAW: f64 = 0.6;

/// 3D camera elevation, in radians
pub const CAMERA_PITCH: f64 = 0.3;

/// 3D scene zoom factor
pub const CAMERA_SCALE: f64 = 0.8;

// ============================================================================
// Server
// ============================================================================

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8765;

/// Largest accepted upload body, in bytes
pub const MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "dataplotter_session";

/// Sessions untouched for this long are dropped
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Most sessions held at once; the least recently used is dropped beyond this
pub const MAX_SESSIONS: usize = 64;
