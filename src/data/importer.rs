//! File import: raw upload + parse options → session table.

use crate::data::csv_parser::parse_table;
use crate::data::error::{DataError, DataResult};
use crate::session::SessionState;
use crate::status::Status;
use crate::types::{ParseOptions, RawUpload};
use serde::Serialize;

/// Result of one import attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// No file selected; nothing happened
    Idle,
    /// Table stored in the session
    Loaded {
        file_name: String,
        rows: usize,
        columns: usize,
    },
    /// Decode or parse failure; the session was cleared
    Failed { file_name: String, error: String },
}

impl ImportOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImportOutcome::Loaded { .. })
    }

    /// Banner for this outcome; `None` when idle
    pub fn status(&self) -> Option<Status> {
        match self {
            ImportOutcome::Idle => None,
            ImportOutcome::Loaded {
                file_name,
                rows,
                columns,
            } => Some(Status::success(format!(
                "File '{}' loaded successfully! ({} rows, {} columns)",
                file_name, rows, columns
            ))),
            ImportOutcome::Failed { error, .. } => {
                Some(Status::error(format!("Error reading file: {}", error)))
            }
        }
    }
}

/// Import an uploaded file into the session
///
/// Without an upload this is a no-op. A failed decode or parse clears the
/// session so a stale table is never shown next to an error.
pub fn import_file(
    session: &mut SessionState,
    raw: Option<&RawUpload>,
    options: &ParseOptions,
) -> ImportOutcome {
    let Some(raw) = raw else {
        return ImportOutcome::Idle;
    };

    let result = decode_upload(&raw.bytes).and_then(|text| parse_table(text, options));

    match result {
        Ok(table) => {
            let rows = table.row_count();
            let columns = table.column_count();
            session.set(table);
            tracing::info!(
                file = %raw.file_name,
                rows,
                columns,
                "Imported file"
            );
            ImportOutcome::Loaded {
                file_name: raw.file_name.clone(),
                rows,
                columns,
            }
        }
        Err(e) => {
            session.clear();
            tracing::warn!(file = %raw.file_name, decode = e.is_decode(), "Import failed: {}", e);
            ImportOutcome::Failed {
                file_name: raw.file_name.clone(),
                error: e.to_string(),
            }
        }
    }
}

/// Decode uploaded bytes as UTF-8, dropping a leading byte-order mark
pub fn decode_upload(bytes: &[u8]) -> DataResult<&str> {
    let text = std::str::from_utf8(bytes).map_err(DataError::Decode)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
