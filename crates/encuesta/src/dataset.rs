//! Dataset identities and their fixed names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EncuestaError;
use crate::export::SOCIOECONOMIC_COLUMNS;

/// The datasets the viewer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Socioeconomic survey with answers as text.
    Original,
    /// Socioeconomic survey with answers replaced by codebook codes.
    Coded,
    /// Variable → label/options metadata.
    Codebook,
    /// Clinical (FC) questionnaire.
    Fc,
}

impl DatasetKind {
    /// All datasets, in export order.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Original,
        DatasetKind::Coded,
        DatasetKind::Codebook,
        DatasetKind::Fc,
    ];

    /// Short name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Original => "original",
            DatasetKind::Coded => "coded",
            DatasetKind::Codebook => "codebook",
            DatasetKind::Fc => "fc",
        }
    }

    /// Default resource the data source reads.
    pub fn default_resource(self) -> &'static str {
        match self {
            DatasetKind::Original => "kobo_data_export.json",
            DatasetKind::Coded => "kobo_data_export_coded.json",
            DatasetKind::Codebook => "libro_codigos.json",
            DatasetKind::Fc => "encuestas_fc.json",
        }
    }

    /// Worksheet name used on export.
    pub fn sheet_name(self) -> &'static str {
        match self {
            DatasetKind::Original => "Encuestas Originales",
            DatasetKind::Coded => "Encuestas Codificadas",
            DatasetKind::Codebook => "Libro de Códigos",
            DatasetKind::Fc => "Encuestas FC",
        }
    }

    /// Workbook file written when this dataset is exported alone.
    pub fn export_file_name(self) -> &'static str {
        match self {
            DatasetKind::Original => "kobo_data_export.xlsx",
            DatasetKind::Coded => "kobo_data_export_coded.xlsx",
            DatasetKind::Codebook => "libro_codigos.xlsx",
            DatasetKind::Fc => "encuestas_fc.xlsx",
        }
    }

    /// Canonical export column order, for the socioeconomic family only.
    pub fn column_order(self) -> Option<&'static [&'static str]> {
        match self {
            DatasetKind::Original | DatasetKind::Coded => Some(&SOCIOECONOMIC_COLUMNS),
            DatasetKind::Codebook | DatasetKind::Fc => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = EncuestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" | "originales" => Ok(DatasetKind::Original),
            "coded" | "codificadas" => Ok(DatasetKind::Coded),
            "codebook" | "libro" | "libro_codigos" => Ok(DatasetKind::Codebook),
            "fc" => Ok(DatasetKind::Fc),
            _ => Err(EncuestaError::UnknownDataset(format!(
                "{}. Use: original, coded, codebook, or fc.",
                s
            ))),
        }
    }
}

/// What an export action covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Dataset(DatasetKind),
    All,
}

impl ExportTarget {
    /// Datasets included, in sheet order.
    pub fn datasets(self) -> Vec<DatasetKind> {
        match self {
            ExportTarget::Dataset(kind) => vec![kind],
            ExportTarget::All => DatasetKind::ALL.to_vec(),
        }
    }

    /// Fixed workbook file name for this target.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportTarget::Dataset(kind) => kind.export_file_name(),
            ExportTarget::All => "encuestas_completas.xlsx",
        }
    }
}

impl FromStr for ExportTarget {
    type Err = EncuestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todo") {
            Ok(ExportTarget::All)
        } else {
            s.parse().map(ExportTarget::Dataset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.name().parse::<DatasetKind>().unwrap(), kind);
        }
        assert!("surveys".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_export_target() {
        assert_eq!("ALL".parse::<ExportTarget>().unwrap(), ExportTarget::All);
        assert_eq!(
            "fc".parse::<ExportTarget>().unwrap(),
            ExportTarget::Dataset(DatasetKind::Fc)
        );
        assert_eq!(ExportTarget::All.datasets().len(), 4);
        assert_eq!(ExportTarget::All.file_name(), "encuestas_completas.xlsx");
    }

    #[test]
    fn test_column_order_only_for_socioeconomic() {
        assert!(DatasetKind::Original.column_order().is_some());
        assert!(DatasetKind::Coded.column_order().is_some());
        assert!(DatasetKind::Fc.column_order().is_none());
        assert!(DatasetKind::Codebook.column_order().is_none());
    }
}
