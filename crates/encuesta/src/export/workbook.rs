//! Projection of datasets into sheets and assembly of the workbook.

use indexmap::IndexMap;
use serde_json::Value;

use crate::codebook::{Codebook, ExportRow, export_rows};
use crate::record::Record;

/// A cell value. `None` means the source had no such field and the cell is
/// left empty; this is distinct from the `N/A` display sentinel.
pub type Cell = Option<Value>;

/// One exported row, columns in output order.
pub type Row = IndexMap<String, Cell>;

/// Rows of one dataset, ready to be laid out in a sheet.
#[derive(Debug, Clone, Copy)]
pub enum ExportSource<'a> {
    /// Survey records, optionally with a canonical column order.
    Records {
        records: &'a [Record],
        column_order: Option<&'a [&'a str]>,
    },
    /// The codebook, exported as `Variable/Pregunta/Código/Respuesta` rows.
    Codebook(&'a Codebook),
}

/// A dataset to place in the workbook under a fixed sheet name.
#[derive(Debug, Clone, Copy)]
pub struct ExportDataset<'a> {
    pub sheet_name: &'a str,
    pub source: ExportSource<'a>,
}

impl<'a> ExportDataset<'a> {
    pub fn records(sheet_name: &'a str, records: &'a [Record], column_order: Option<&'a [&'a str]>) -> Self {
        Self {
            sheet_name,
            source: ExportSource::Records {
                records,
                column_order,
            },
        }
    }

    pub fn codebook(sheet_name: &'a str, codebook: &'a Codebook) -> Self {
        Self {
            sheet_name,
            source: ExportSource::Codebook(codebook),
        }
    }

    /// Rows this dataset contributes to its sheet.
    pub fn rows(&self) -> Vec<Row> {
        match self.source {
            ExportSource::Records {
                records,
                column_order: Some(order),
            } => records.iter().map(|r| project(r, order)).collect(),
            ExportSource::Records {
                records,
                column_order: None,
            } => records.iter().map(pass_through).collect(),
            ExportSource::Codebook(codebook) => {
                export_rows(codebook).iter().map(codebook_row).collect()
            }
        }
    }
}

/// A named sheet of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Column headers: every key seen across rows, in first-seen order.
    pub fn headers(&self) -> Vec<&str> {
        let mut headers: IndexMap<&str, ()> = IndexMap::new();
        for row in &self.rows {
            for key in row.keys() {
                headers.entry(key.as_str()).or_insert(());
            }
        }
        headers.into_keys().collect()
    }
}

/// An assembled workbook, sheets in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Total data rows across sheets (headers excluded).
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// Project a record onto exactly the listed columns, in that order.
pub fn project(record: &Record, column_order: &[&str]) -> Row {
    column_order
        .iter()
        .map(|&column| (column.to_string(), record.get(column).cloned()))
        .collect()
}

/// Keep a record's own fields and order.
pub fn pass_through(record: &Record) -> Row {
    record
        .iter()
        .map(|(key, value)| (key.to_string(), Some(value.clone())))
        .collect()
}

fn codebook_row(row: &ExportRow) -> Row {
    let values = [&row.variable, &row.question, &row.code, &row.response];
    ExportRow::HEADERS
        .iter()
        .zip(values)
        .map(|(header, value)| (header.to_string(), Some(Value::String(value.clone()))))
        .collect()
}

/// Build a workbook with one sheet per non-empty dataset.
pub fn build_workbook(datasets: &[ExportDataset<'_>]) -> Workbook {
    let sheets = datasets
        .iter()
        .filter_map(|dataset| {
            let rows = dataset.rows();
            if rows.is_empty() {
                tracing::debug!(sheet = dataset.sheet_name, "skipping empty sheet");
                return None;
            }
            Some(Sheet {
                name: dataset.sheet_name.to_string(),
                rows,
            })
        })
        .collect();

    Workbook { sheets }
}
