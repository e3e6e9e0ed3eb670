//! Data source abstraction and metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::codebook::Codebook;
use crate::config::SourceConfig;
use crate::dataset::DatasetKind;
use crate::error::{EncuestaError, Result};
use crate::import::import_workbook;
use crate::record::Record;

/// Metadata about a loaded resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Resource name (file name without path).
    pub resource: String,
    /// Full path to the resource, when it came from disk.
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the resource bytes.
    pub hash: String,
    /// Resource size in bytes.
    pub size_bytes: u64,
    /// Number of records (or codebook variables).
    pub row_count: usize,
    /// When the resource was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for resource bytes that have just been parsed.
    pub fn new(resource: impl Into<String>, path: Option<PathBuf>, bytes: &[u8], row_count: usize) -> Self {
        Self {
            resource: resource.into(),
            path,
            hash: hash_bytes(bytes),
            size_bytes: bytes.len() as u64,
            row_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Hash bytes as `sha256:<hex>`.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

/// A parsed dataset together with where it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub metadata: Option<SourceMetadata>,
}

impl<T> Loaded<T> {
    /// Data with no provenance (e.g. built in memory).
    pub fn bare(data: T) -> Self {
        Self {
            data,
            metadata: None,
        }
    }
}

/// External provider of parsed datasets.
pub trait DataSource {
    /// Load the survey records of a dataset.
    fn load_records(&self, kind: DatasetKind) -> Result<Loaded<Vec<Record>>>;

    /// Load the codebook.
    fn load_codebook(&self) -> Result<Loaded<Codebook>>;
}

/// Reads datasets from files in a directory.
///
/// `.json` resources are parsed as JSON; `.xlsx`, `.xls` and `.ods` resources
/// are imported from their first worksheet.
#[derive(Debug, Clone)]
pub struct FileSource {
    config: SourceConfig,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(SourceConfig::new(data_dir))
    }

    pub fn with_config(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn read(&self, kind: DatasetKind) -> Result<(PathBuf, Vec<u8>)> {
        let path = self.config.resource_path(kind);
        let bytes = fs::read(&path).map_err(|e| EncuestaError::io(&path, e))?;
        Ok((path, bytes))
    }

    fn metadata(&self, kind: DatasetKind, path: PathBuf, bytes: &[u8], rows: usize) -> SourceMetadata {
        SourceMetadata::new(self.config.resource(kind), Some(path), bytes, rows)
    }
}

impl DataSource for FileSource {
    fn load_records(&self, kind: DatasetKind) -> Result<Loaded<Vec<Record>>> {
        let (path, bytes) = self.read(kind)?;
        let records = if is_workbook(&path) {
            import_workbook(&path)?
        } else {
            parse_json::<Vec<Record>>(self.config.resource(kind), &bytes)?
        };

        let metadata = self.metadata(kind, path, &bytes, records.len());
        Ok(Loaded {
            data: records,
            metadata: Some(metadata),
        })
    }

    fn load_codebook(&self) -> Result<Loaded<Codebook>> {
        let kind = DatasetKind::Codebook;
        let (path, bytes) = self.read(kind)?;
        let codebook = parse_json::<Codebook>(self.config.resource(kind), &bytes)?;

        let metadata = self.metadata(kind, path, &bytes, codebook.len());
        Ok(Loaded {
            data: codebook,
            metadata: Some(metadata),
        })
    }
}

/// Check if a path names a spreadsheet rather than JSON.
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
        .unwrap_or(false)
}

fn parse_json<T: DeserializeOwned>(resource: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| EncuestaError::Malformed {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

/// Read a JSON record array from any path.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if is_workbook(path) {
        return import_workbook(path);
    }
    let bytes = fs::read(path).map_err(|e| EncuestaError::io(path, e))?;
    parse_json(&path.display().to_string(), &bytes)
}

/// Read a codebook JSON file from any path.
pub fn read_codebook(path: impl AsRef<Path>) -> Result<Codebook> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| EncuestaError::io(path, e))?;
    parse_json(&path.display().to_string(), &bytes)
}

/// Write records as a pretty-printed JSON array, keeping non-ASCII text as is.
pub fn write_records(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|e| EncuestaError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_records_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "encuestas_fc.json",
            r#"[{"Paciente": "F1", "Peso": 70}, {"Paciente": "F2"}]"#,
        );

        let source = FileSource::new(dir.path());
        let loaded = source.load_records(DatasetKind::Fc).unwrap();
        assert_eq!(loaded.data.len(), 2);

        let metadata = loaded.metadata.unwrap();
        assert_eq!(metadata.resource, "encuestas_fc.json");
        assert_eq!(metadata.row_count, 2);
        assert!(metadata.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_load_codebook() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "libro_codigos.json",
            r#"{"fuma": {"label": "¿Fuma?", "categories": {"1": "Sí"}}}"#,
        );

        let loaded = FileSource::new(dir.path()).load_codebook().unwrap();
        assert_eq!(loaded.data.len(), 1);
    }

    #[test]
    fn test_missing_resource_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path())
            .load_records(DatasetKind::Original)
            .unwrap_err();
        assert!(matches!(err, EncuestaError::Io { .. }));
    }

    #[test]
    fn test_malformed_resource() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "kobo_data_export.json", r#"{"not": "an array"}"#);
        let err = FileSource::new(dir.path())
            .load_records(DatasetKind::Original)
            .unwrap_err();
        assert!(matches!(err, EncuestaError::Malformed { .. }));
    }

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook(Path::new("Libro1.XLSX")));
        assert!(!is_workbook(Path::new("kobo_data_export.json")));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_bytes(b"abc"), hash_bytes(b"abc"));
        assert_ne!(hash_bytes(b"abc"), hash_bytes(b"abd"));
    }
}
