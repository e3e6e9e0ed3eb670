//! CLI command implementations.

pub mod codify;
pub mod export;
pub mod import;
pub mod show;
pub mod status;
pub mod translate;

use std::path::{Path, PathBuf};

use encuesta::{FileSource, SourceConfig};

/// Where datasets are read from, as given on the command line.
#[derive(Debug, Clone)]
pub struct SourceArgs {
    pub data_dir: PathBuf,
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Settings from `--config` when given, otherwise defaults under `--data-dir`.
    pub fn source_config(&self) -> encuesta::Result<SourceConfig> {
        match &self.config {
            Some(path) => SourceConfig::load(path),
            None => Ok(SourceConfig::new(&self.data_dir)),
        }
    }

    pub fn file_source(&self) -> encuesta::Result<FileSource> {
        Ok(FileSource::with_config(self.source_config()?))
    }
}

/// `dir/stem<suffix>.json` next to `path`.
pub(crate) fn sibling_json(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{}{}.json", stem, suffix))
}
