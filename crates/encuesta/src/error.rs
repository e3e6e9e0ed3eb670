//! Error types for the Encuesta library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Encuesta operations.
#[derive(Debug, Error)]
pub enum EncuestaError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the xlsx writer.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Error opening or reading a workbook.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// A resource did not have the expected shape (e.g. not a JSON array).
    #[error("Malformed resource '{resource}': {message}")]
    Malformed { resource: String, message: String },

    /// Dataset name not recognised.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Export requested but there are no records to write.
    #[error("{0}")]
    EmptyExport(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EncuestaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for Encuesta operations.
pub type Result<T> = std::result::Result<T, EncuestaError>;
