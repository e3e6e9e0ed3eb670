//! Workbook export: column projection, sheet assembly and writers.
//!
//! ```no_run
//! use encuesta::export::{ExportDataset, WorkbookWriter, XlsxWriter, build_workbook};
//! use encuesta::{DatasetKind, Record};
//!
//! # fn example(records: Vec<Record>) -> encuesta::Result<()> {
//! let kind = DatasetKind::Original;
//! let workbook = build_workbook(&[ExportDataset::records(
//!     kind.sheet_name(),
//!     &records,
//!     kind.column_order(),
//! )]);
//! XlsxWriter::new().write(&workbook, kind.export_file_name().as_ref())?;
//! # Ok(())
//! # }
//! ```

mod columns;
mod workbook;
mod writer;

pub use columns::SOCIOECONOMIC_COLUMNS;
pub use workbook::{
    Cell, ExportDataset, ExportSource, Row, Sheet, Workbook, build_workbook, pass_through, project,
};
pub use writer::{CsvWriter, WorkbookWriter, XlsxWriter};
