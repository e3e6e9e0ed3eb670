//! Configuration for data sources and exports.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetKind;
use crate::error::{EncuestaError, Result};
use crate::export::{CsvWriter, WorkbookWriter, XlsxWriter};

/// Where datasets are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the dataset resources.
    pub data_dir: PathBuf,
    /// Resource name overrides per dataset (defaults to the built-in names).
    pub resources: BTreeMap<DatasetKind, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            resources: BTreeMap::new(),
        }
    }
}

impl SourceConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Override the resource file for one dataset.
    pub fn with_resource(mut self, kind: DatasetKind, resource: impl Into<String>) -> Self {
        self.resources.insert(kind, resource.into());
        self
    }

    /// Resource name for a dataset.
    pub fn resource(&self, kind: DatasetKind) -> &str {
        self.resources
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_resource())
    }

    /// Full path of a dataset's resource.
    pub fn resource_path(&self, kind: DatasetKind) -> PathBuf {
        self.data_dir.join(self.resource(kind))
    }

    /// Load configuration from a JSON file.
    ///
    /// A relative `data_dir` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EncuestaError::io(path, e))?;
        let mut config: SourceConfig = serde_json::from_str(&content).map_err(|e| {
            EncuestaError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }
}

/// Output format for exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = EncuestaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(EncuestaError::Config(format!(
                "Unknown format: {}. Use xlsx or csv.",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "xlsx"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Where and how exports are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: ExportFormat::default(),
        }
    }
}

impl ExportConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Writer for the configured format.
    pub fn writer(&self) -> Box<dyn WorkbookWriter> {
        match self.format {
            ExportFormat::Xlsx => Box::new(XlsxWriter::new()),
            ExportFormat::Csv => Box::new(CsvWriter::new()),
        }
    }
}
