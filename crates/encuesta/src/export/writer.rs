//! Writers that put an assembled [`Workbook`] on disk.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use serde_json::Value;

use crate::error::{EncuestaError, Result};
use crate::record::value_text;

use super::workbook::{Cell, Sheet, Workbook};

/// Capability to write tabular rows to named sheets in a workbook file.
pub trait WorkbookWriter {
    /// File extension produced by this writer (without the dot).
    fn extension(&self) -> &'static str;

    /// Write the workbook to `path`, returning every file actually written.
    ///
    /// Single-file formats return `path` itself; formats with one file per
    /// sheet return those files in sheet order.
    fn write(&self, workbook: &Workbook, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Excel writer backed by `rust_xlsxwriter`.
#[derive(Debug, Clone, Default)]
pub struct XlsxWriter {
    /// Write the header row in bold.
    pub bold_headers: bool,
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self { bold_headers: true }
    }
}

impl WorkbookWriter for XlsxWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<Vec<PathBuf>> {
        let mut xlsx = XlsxWorkbook::new();
        let header_format = if self.bold_headers {
            Format::new().set_bold()
        } else {
            Format::new()
        };

        for sheet in &workbook.sheets {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_sheet(worksheet, sheet, &header_format)?;
        }

        ensure_parent(path)?;
        xlsx.save(path)?;
        tracing::info!(path = %path.display(), sheets = workbook.sheets.len(), "workbook written");
        Ok(vec![path.to_path_buf()])
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header_format: &Format) -> Result<()> {
    let headers = sheet.headers();
    if headers.len() > MAX_COLUMNS {
        return Err(EncuestaError::Workbook(format!(
            "sheet '{}' has {} columns, more than the {} a worksheet holds",
            sheet.name,
            headers.len(),
            MAX_COLUMNS
        )));
    }
    if sheet.rows.len() >= MAX_ROWS {
        return Err(EncuestaError::Workbook(format!(
            "sheet '{}' has {} rows, more than a worksheet holds",
            sheet.name,
            sheet.rows.len()
        )));
    }

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, *header, header_format)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let xlsx_row = row_index(row_idx + 1)?;
        for (col, header) in headers.iter().enumerate() {
            if let Some(Some(value)) = row.get(*header) {
                write_value(worksheet, xlsx_row, column_index(col)?, value)?;
            }
        }
    }

    Ok(())
}

/// Worksheet limits of the xlsx format.
const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| EncuestaError::Workbook(format!("column {} is out of range", col)))
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| EncuestaError::Workbook(format!("row {} is out of range", row)))
}

fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<()> {
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
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        other => {
            worksheet.write_string(row, col, value_text(other))?;
        }
    }
    Ok(())
}

/// CSV writer: one file per sheet, named `<stem>-<sheet>.csv`.
#[derive(Debug, Clone, Default)]
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Path of the CSV file a sheet is written to.
    pub fn sheet_path(path: &Path, sheet_name: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sheet = sheet_name.replace(char::is_whitespace, "_");
        path.with_file_name(format!("{}-{}.csv", stem, sheet))
    }
}

impl WorkbookWriter for CsvWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<Vec<PathBuf>> {
        ensure_parent(path)?;

        let mut written = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            let sheet_path = Self::sheet_path(path, &sheet.name);
            let mut writer = csv::Writer::from_path(&sheet_path)?;
            let headers = sheet.headers();
            writer.write_record(&headers)?;

            for row in &sheet.rows {
                writer.write_record(headers.iter().map(|h| cell_text(row.get(*h))))?;
            }
            writer.flush().map_err(|e| EncuestaError::io(&sheet_path, e))?;
            tracing::info!(path = %sheet_path.display(), "sheet written");
            written.push(sheet_path);
        }

        Ok(written)
    }
}

fn cell_text(cell: Option<&Cell>) -> String {
    match cell {
        Some(Some(Value::Null)) | Some(None) | None => String::new(),
        Some(Some(value)) => value_text(value),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| EncuestaError::io(parent, e))?;
        }
    }
    Ok(())
}
