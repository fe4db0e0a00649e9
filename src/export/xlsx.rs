#![cfg(feature = "excel")]

//! Spreadsheet (`.xlsx`) export.
//!
//! Layout:
//! - one worksheet
//! - row 0: field names, taken from the first record's keys (in order)
//! - row 1..: one row per record, values in header order
//! - each column is as wide as its longest header/value text

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use crate::error::{PeopleError, PeopleResult};
use crate::record::{ProjectedRecord, value_text};

/// Write `projection` to `path` as a single-sheet workbook, replacing any existing file.
///
/// Every record must carry the first record's keys; a missing key fails with
/// [`PeopleError::KeyNotFound`] before anything is written. An empty projection produces an empty
/// worksheet.
pub fn write_xlsx_to_path(
    path: impl AsRef<Path>,
    projection: &[ProjectedRecord],
) -> PeopleResult<()> {
    let headers = header_keys(projection);
    let widths = column_widths(projection)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col_num(col)?, *header)?;
    }

    for (idx, record) in projection.iter().enumerate() {
        let row = row_num(idx + 1)?;
        for (col, header) in headers.iter().enumerate() {
            // Presence was checked by `column_widths`.
            if let Some(value) = record.get(*header) {
                write_cell(worksheet, row, col_num(col)?, value)?;
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col_num(col)?, *width as f64)?;
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

/// Column names: the first record's keys, in order.
pub fn header_keys(projection: &[ProjectedRecord]) -> Vec<&str> {
    projection
        .first()
        .map(|first| first.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Character width of every column: the longest of the header and the rendered values.
pub fn column_widths(projection: &[ProjectedRecord]) -> PeopleResult<Vec<usize>> {
    let headers = header_keys(projection);
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for record in projection {
        for (col, header) in headers.iter().enumerate() {
            let value = record.get(*header).ok_or_else(|| PeopleError::KeyNotFound {
                path: header.to_string(),
                segment: header.to_string(),
            })?;
            widths[col] = widths[col].max(cell_text(value).chars().count());
        }
    }
    Ok(widths)
}

/// Text shown in a cell for `value`; `null` renders as an empty cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_text(other),
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> PeopleResult<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        other => {
            worksheet.write_string(row, col, value_text(other))?;
        }
    }
    Ok(())
}

fn col_num(col: usize) -> PeopleResult<u16> {
    u16::try_from(col)
        .map_err(|_| PeopleError::invalid(format!("too many columns for a worksheet ({col})")))
}

fn row_num(row: usize) -> PeopleResult<u32> {
    u32::try_from(row)
        .map_err(|_| PeopleError::invalid(format!("too many rows for a worksheet ({row})")))
}
