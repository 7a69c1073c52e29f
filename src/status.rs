//! User-visible status banners.
//!
//! Every operation that can fail reports through a [`Status`] instead of
//! propagating an error out of the session.

use serde::Serialize;

/// Banner variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusVariant {
    Info,
    Success,
    Warning,
    Error,
}

/// A single status message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Status {
    pub variant: StatusVariant,
    pub message: String,
}

impl Status {
    pub fn new(variant: StatusVariant, message: impl Into<String>) -> Self {
        Self {
            variant,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusVariant::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusVariant::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusVariant::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusVariant::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.variant == StatusVariant::Error
    }
}

/// Banner shown before any file has been loaded
pub fn welcome() -> Status {
    Status::info("To get started, upload a CSV or TXT file using the panel above.")
}

/// Hint shown above the table preview
pub fn table_hint() -> Status {
    Status::info(
        "This is a preview of the loaded data. Click a column header to sort by that column.",
    )
}

/// Hint shown above the chart controls
pub fn chart_hint() -> Status {
    Status::info("Use the chart controls to map the axes, customize and export the chart.")
}

/// Note attached to surface charts
pub fn surface_note() -> Status {
    Status::warning(
        "Surface charts need grid-structured data: every (X, Y) pair exactly once. \
         If your data is sparse (X, Y, Z) triples, use Scatter 3D.",
    )
}
