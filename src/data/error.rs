//! Error types for data operations
//!
//! Provides unified error handling for decoding and parsing uploaded files.
//! Every variant here invalidates the session's current table.

use thiserror::Error;

/// Errors that can occur while importing a file
#[derive(Error, Debug)]
pub enum DataError {
    /// Upload is not valid UTF-8 text
    #[error("file is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Generic parse failure (empty input, malformed rows)
    #[error("CSV parse error: {0}")]
    Parse(String),

    /// A header-less parse produced a single column
    #[error("parsing failed, delimiter likely incorrect")]
    DelimiterLikelyIncorrect,

    /// Delimiter option left blank
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    /// Column lengths or names violate the table invariants
    #[error("invalid table: {0}")]
    InvalidTable(String),

    /// Upload name without a .csv/.txt extension
    #[error("unsupported file '{0}': expected a .csv or .txt file")]
    UnsupportedFile(String),

    /// Polars error
    #[error("{0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl DataError {
    /// Whether this error came from decoding rather than parsing
    pub fn is_decode(&self) -> bool {
        matches!(self, DataError::Decode(_))
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
