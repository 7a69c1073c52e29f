//! CSV and TXT parsing
//!
//! Parses decoded text into a [`Table`] using polars for tokenizing and
//! per-column type inference. Column types are decided once from the full
//! column; anything polars cannot type as numeric or temporal becomes text.

use crate::constants::{HEADER_SNIFF_ROWS, SUBSTITUTE_SEPARATOR, SYNTHESIZED_COLUMN_PREFIX};
use crate::data::error::{DataError, DataResult};
use crate::types::{Column, ColumnData, HeaderMode, ParseOptions, Table};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{CsvReadOptions, DataFrame, DataType, SerReader, Series, TimeUnit};
use std::io::Cursor;
use std::time::Instant;

/// Parse CSV/TXT content into a Table according to the user's options
///
/// A header-less parse that yields exactly one column is rejected with
/// [`DataError::DelimiterLikelyIncorrect`]; a legitimately single-column
/// header-less file is rejected too.
pub fn parse_table(content: &str, options: &ParseOptions) -> DataResult<Table> {
    let start = Instant::now();
    let delimiter = resolve_delimiter(&options.delimiter)?;

    let body = data_lines(content, options.skip_rows);
    if body.is_empty() {
        return Err(DataError::Parse(format!(
            "no data left after skipping {} rows",
            options.skip_rows
        )));
    }

    let has_header = match options.header_mode {
        HeaderMode::FirstRowIsHeader => true,
        HeaderMode::NoHeader => false,
        HeaderMode::Infer => sniff_header(&body, &delimiter),
    };

    let frame = read_frame(&body, &delimiter, has_header)?;

    if !has_header && frame.width() == 1 && options.header_mode == HeaderMode::NoHeader {
        return Err(DataError::DelimiterLikelyIncorrect);
    }

    let table = frame_to_table(&frame, !has_header)?;

    tracing::debug!(
        "Parsed {} rows x {} cols (header: {}) in {:?}",
        table.row_count(),
        table.column_count(),
        has_header,
        start.elapsed()
    );

    Ok(table)
}

/// Turn the user's delimiter text into the literal separator
///
/// `\t` (backslash, t) stands for a tab. The delimiter is not trimmed so a
/// single space stays a valid separator.
pub fn resolve_delimiter(raw: &str) -> DataResult<String> {
    let resolved = raw.replace("\\t", "\t");
    if resolved.is_empty() {
        return Err(DataError::EmptyDelimiter);
    }
    Ok(resolved)
}

/// Check if a file name has an importable extension (.csv/.txt)
pub fn is_importable_file(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            crate::constants::IMPORTABLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Lines after the first `skip_rows`, with blank lines dropped
///
/// Skipped lines are counted before blank lines are removed, so a blank
/// line inside the skipped prefix still counts towards `skip_rows`.
fn data_lines(content: &str, skip_rows: usize) -> String {
    let mut body = String::with_capacity(content.len());
    for line in content
        .lines()
        .skip(skip_rows)
        .filter(|line| !line.trim().is_empty())
    {
        body.push_str(line);
        body.push('\n');
    }
    body
}

/// Run the polars CSV reader over the content
///
/// Multi-byte delimiters are substituted by a single control byte because
/// the reader only accepts one-byte separators.
fn read_frame(content: &str, delimiter: &str, has_header: bool) -> DataResult<DataFrame> {
    let (bytes, separator) = match delimiter.as_bytes() {
        [byte] => (content.as_bytes().to_vec(), *byte),
        _ => {
            let substitute = char::from(SUBSTITUTE_SEPARATOR).to_string();
            (
                content.replace(delimiter, &substitute).into_bytes(),
                SUBSTITUTE_SEPARATOR,
            )
        }
    };

    let frame = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(None)
        .map_parse_options(|parse| {
            parse
                .with_separator(separator)
                .with_try_parse_dates(true)
        })
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    Ok(frame)
}

/// Convert a polars frame into the columnar Table model
fn frame_to_table(frame: &DataFrame, synthesize_names: bool) -> DataResult<Table> {
    let columns = frame
        .get_columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let series = column.as_materialized_series();
            let name = if synthesize_names {
                format!("{}{}", SYNTHESIZED_COLUMN_PREFIX, i + 1)
            } else {
                series.name().to_string()
            };
            Ok(Column::new(name, column_data(series)?))
        })
        .collect::<DataResult<Vec<_>>>()?;

    Table::new(columns)
}

/// Map a polars series onto one of the three column variants
fn column_data(series: &Series) -> DataResult<ColumnData> {
    let data = match series.dtype() {
        DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => {
            let values = series.cast(&DataType::Float64)?;
            ColumnData::Numeric(values.f64()?.into_iter().collect())
        }
        DataType::Date | DataType::Datetime(_, _) => {
            let millis = series
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            ColumnData::Temporal(
                millis
                    .i64()?
                    .into_iter()
                    .map(|v| v.and_then(millis_to_datetime))
                    .collect(),
            )
        }
        DataType::String => {
            let values: Vec<Option<String>> = series
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            retype_padded(&values).unwrap_or(ColumnData::Text(values))
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            ColumnData::Text(
                text.str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        }
    };
    Ok(data)
}

/// Retype a text column whose cells are numbers or dates padded with spaces
///
/// The reader keeps whitespace next to the separator, so `1, 2` yields the
/// text `" 2"`. Blank cells count as missing. Returns `None` when any cell
/// is neither, or when every cell is blank.
fn retype_padded(values: &[Option<String>]) -> Option<ColumnData> {
    let trimmed: Vec<Option<&str>> = values
        .iter()
        .map(|v| v.as_deref().map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    if trimmed.iter().all(Option::is_none) {
        return None;
    }

    let numbers: Option<Vec<Option<f64>>> = trimmed
        .iter()
        .map(|v| match v {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    if let Some(numbers) = numbers {
        return Some(ColumnData::Numeric(numbers));
    }

    let dates: Option<Vec<Option<NaiveDateTime>>> = trimmed
        .iter()
        .map(|v| match v {
            None => Some(None),
            Some(s) => parse_datetime(s).map(Some),
        })
        .collect();
    dates.map(ColumnData::Temporal)
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Guess whether the first data line is a header
///
/// Each column votes: a numeric data column whose first cell is not numeric
/// votes for a header, a numeric first cell votes against. Text columns with
/// fixed-length values vote by whether the first cell matches that length.
/// Ties keep the first row as header.
fn sniff_header(content: &str, delimiter: &str) -> bool {
    let rows: Vec<Vec<&str>> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(HEADER_SNIFF_ROWS + 1)
        .map(|line| split_line(line, delimiter))
        .collect();

    let Some((header, data)) = rows.split_first() else {
        return true;
    };

    if data.is_empty() {
        return !header.iter().any(|cell| looks_like_number(cell));
    }

    let mut votes: i32 = 0;
    for (col, cell) in header.iter().enumerate() {
        let values: Vec<&str> = data
            .iter()
            .filter_map(|row| row.get(col).copied())
            .filter(|v| !v.is_empty())
            .collect();
        let Some(first) = values.first() else {
            continue;
        };

        if values.iter().all(|v| looks_like_number(v)) {
            votes += if looks_like_number(cell) { -1 } else { 1 };
        } else {
            let len = first.chars().count();
            if values.iter().all(|v| v.chars().count() == len) {
                votes += if cell.chars().count() == len { -1 } else { 1 };
            }
        }
    }

    votes >= 0
}

/// Split a line on a (possibly multi-character) delimiter, respecting quotes
fn split_line<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    let bytes = line.as_bytes();
    let pattern = delimiter.as_bytes();
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' {
            in_quotes = !in_quotes;
            i += 1;
        } else if !in_quotes && bytes[i..].starts_with(pattern) {
            fields.push(unquote(&line[start..i]));
            i += pattern.len();
            start = i;
        } else {
            i += 1;
        }
    }

    fields.push(unquote(&line[start..]));
    fields
}

/// Remove surrounding quotes from a field
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Check if a field parses as a plain number
fn looks_like_number(s: &str) -> bool {
    let cleaned = s.trim();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}
