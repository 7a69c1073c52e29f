//! Data import and presentation
//!
//! This module turns uploaded bytes into a typed [`Table`](crate::types::Table)
//! and serves read-only, sortable pages of it.
//!
//! ## Error Handling
//!
//! All import operations return `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `Decode`: the upload is not UTF-8
//! - `DelimiterLikelyIncorrect`: a header-less parse produced one column
//! - `Polars`: the CSV reader rejected the content

mod csv_parser;
pub mod error;
mod importer;
mod table_view;

pub use csv_parser::*;
pub use error::*;
pub use importer::*;
pub use table_view::*;
