//! Read survey records from an Excel/ODS workbook.
//!
//! The first worksheet is used. Its first row holds the field names; rows
//! whose cells are all empty are skipped.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value;

use crate::error::{EncuestaError, Result};
use crate::record::Record;

/// Import the first worksheet of a workbook as records.
pub fn import_workbook(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        EncuestaError::Workbook(format!("Failed to open '{}': {}", path.display(), e))
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EncuestaError::Workbook(format!("'{}' contains no sheets", path.display())))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        EncuestaError::Workbook(format!("Failed to read sheet '{}': {}", sheet_name, e))
    })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(Vec::new()),
    };

    let records: Vec<Record> = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = row.get(idx).map(cell_value).unwrap_or(Value::Null);
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = records.len(),
        "imported worksheet"
    );
    Ok(records)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => value_to_header(cell_value(other)),
    }
}

fn value_to_header(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => crate::record::value_text(&other),
    }
}

/// Convert a cell to a JSON value. Integral floats become integers.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::from(*f as i64)
            } else {
                Value::from(*f)
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::DateTime(dt) => Value::from(dt.as_f64()),
    }
}
