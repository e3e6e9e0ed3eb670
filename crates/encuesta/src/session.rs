//! Per-load session state: one slot per dataset.
//!
//! The session owns every dataset between loading and the user's actions.
//! Slots are only ever replaced wholesale. Filtering and card rendering read
//! from the slots; export always uses the full, unfiltered data.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::codebook::Codebook;
use crate::dataset::{DatasetKind, ExportTarget};
use crate::error::{EncuestaError, Result};
use crate::export::{ExportDataset, Workbook, WorkbookWriter, build_workbook};
use crate::filter::{filter_codebook, filter_records};
use crate::record::Record;
use crate::render::{Card, codebook_cards, record_cards};
use crate::source::{DataSource, Loaded, SourceMetadata};

/// Notice shown when an export has nothing to write.
pub const EMPTY_EXPORT_NOTICE: &str = "No hay datos para exportar.";

/// Outcome of loading a set of datasets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<DatasetKind>,
    /// Datasets that failed, with the error message. Their slots are empty.
    pub failed: Vec<(DatasetKind, String)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load state and size of one slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub dataset: DatasetKind,
    pub rows: usize,
    pub source: Option<SourceMetadata>,
}

#[derive(Debug, Clone, Default)]
struct Slot<T> {
    data: T,
    source: Option<SourceMetadata>,
}

impl<T: Default> Slot<T> {
    fn replace(&mut self, loaded: Loaded<T>) {
        *self = Slot {
            data: loaded.data,
            source: loaded.metadata,
        };
    }

    fn clear(&mut self) {
        *self = Slot::default();
    }
}

/// Owner of every dataset for one viewing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    original: Slot<Vec<Record>>,
    coded: Slot<Vec<Record>>,
    fc: Slot<Vec<Record>>,
    codebook: Slot<Codebook>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the given datasets from `source`.
    ///
    /// Every dataset is attempted. A failure is logged, leaves that slot
    /// empty, and does not stop the others from loading.
    pub fn load(&mut self, source: &dyn DataSource, kinds: &[DatasetKind]) -> LoadReport {
        let mut report = LoadReport::default();

        for &kind in kinds {
            let result = match kind {
                DatasetKind::Codebook => source.load_codebook().map(|loaded| {
                    self.codebook.replace(loaded);
                }),
                _ => source.load_records(kind).map(|loaded| {
                    if let Some(slot) = self.records_slot_mut(kind) {
                        slot.replace(loaded);
                    }
                }),
            };

            match result {
                Ok(()) => {
                    tracing::info!(dataset = %kind, rows = self.row_count(kind), "dataset loaded");
                    report.loaded.push(kind);
                }
                Err(e) => {
                    tracing::warn!(dataset = %kind, error = %e, "failed to load dataset, treating as empty");
                    self.clear(kind);
                    report.failed.push((kind, e.to_string()));
                }
            }
        }

        report
    }

    /// Load every known dataset.
    pub fn load_all(&mut self, source: &dyn DataSource) -> LoadReport {
        self.load(source, &DatasetKind::ALL)
    }

    /// Replace a survey dataset. Use [`Session::replace_codebook`] for the codebook.
    pub fn replace_records(&mut self, kind: DatasetKind, records: Vec<Record>) -> Result<()> {
        match self.records_slot_mut(kind) {
            Some(slot) => {
                slot.replace(Loaded::bare(records));
                Ok(())
            }
            None => Err(EncuestaError::UnknownDataset(format!(
                "{} is not a record dataset",
                kind
            ))),
        }
    }

    /// Replace the codebook.
    pub fn replace_codebook(&mut self, codebook: Codebook) {
        self.codebook.replace(Loaded::bare(codebook));
    }

    fn clear(&mut self, kind: DatasetKind) {
        match kind {
            DatasetKind::Codebook => self.codebook.clear(),
            _ => {
                if let Some(slot) = self.records_slot_mut(kind) {
                    slot.clear();
                }
            }
        }
    }

    fn records_slot(&self, kind: DatasetKind) -> Option<&Slot<Vec<Record>>> {
        match kind {
            DatasetKind::Original => Some(&self.original),
            DatasetKind::Coded => Some(&self.coded),
            DatasetKind::Fc => Some(&self.fc),
            DatasetKind::Codebook => None,
        }
    }

    fn records_slot_mut(&mut self, kind: DatasetKind) -> Option<&mut Slot<Vec<Record>>> {
        match kind {
            DatasetKind::Original => Some(&mut self.original),
            DatasetKind::Coded => Some(&mut self.coded),
            DatasetKind::Fc => Some(&mut self.fc),
            DatasetKind::Codebook => None,
        }
    }

    /// Records of a survey dataset; empty for the codebook.
    pub fn records(&self, kind: DatasetKind) -> &[Record] {
        self.records_slot(kind)
            .map(|slot| slot.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook.data
    }

    /// Rows held for a dataset (variables, for the codebook).
    pub fn row_count(&self, kind: DatasetKind) -> usize {
        match kind {
            DatasetKind::Codebook => self.codebook.data.len(),
            _ => self.records(kind).len(),
        }
    }

    /// Load state of every slot.
    pub fn status(&self) -> Vec<SlotStatus> {
        DatasetKind::ALL
            .iter()
            .map(|&kind| SlotStatus {
                dataset: kind,
                rows: self.row_count(kind),
                source: match kind {
                    DatasetKind::Codebook => self.codebook.source.clone(),
                    _ => self.records_slot(kind).and_then(|s| s.source.clone()),
                },
            })
            .collect()
    }

    /// Cards for a dataset, narrowed by the search term.
    pub fn cards(&self, kind: DatasetKind, term: &str) -> Vec<Card> {
        match kind {
            DatasetKind::Codebook => codebook_cards(&filter_codebook(term, self.codebook())),
            _ => record_cards(filter_records(term, self.records(kind))),
        }
    }

    /// Assemble the workbook for an export target from the unfiltered data.
    pub fn workbook(&self, target: ExportTarget) -> Workbook {
        let datasets: Vec<ExportDataset<'_>> = target
            .datasets()
            .into_iter()
            .map(|kind| match kind {
                DatasetKind::Codebook => ExportDataset::codebook(kind.sheet_name(), self.codebook()),
                _ => ExportDataset::records(kind.sheet_name(), self.records(kind), kind.column_order()),
            })
            .collect();
        build_workbook(&datasets)
    }

    /// Export a target into `out_dir` under its fixed file name.
    ///
    /// Returns the files the writer produced (one per sheet for CSV). Fails with [`EncuestaError::EmptyExport`]
    /// when the target holds no rows; nothing is written in that case.
    pub fn export(
        &self,
        target: ExportTarget,
        writer: &dyn WorkbookWriter,
        out_dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let loaded: usize = target.datasets().into_iter().map(|k| self.row_count(k)).sum();
        if loaded == 0 {
            return Err(EncuestaError::EmptyExport(EMPTY_EXPORT_NOTICE.to_string()));
        }

        let workbook = self.workbook(target);
        if workbook.is_empty() {
            return Err(EncuestaError::EmptyExport(EMPTY_EXPORT_NOTICE.to_string()));
        }

        let path = out_dir
            .as_ref()
            .join(target.file_name())
            .with_extension(writer.extension());
        writer.write(&workbook, &path)
    }
}
