//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use encuesta::{DEFAULT_MIN_SCORE, DatasetKind, EncuestaError, ExportFormat, ExportTarget};

/// Encuesta: browse, filter and export survey datasets
#[derive(Parser)]
#[command(name = "encuesta")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the dataset files
    #[arg(short, long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// JSON file with data source settings (overrides --data-dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a dataset as cards
    Show {
        /// Dataset to show (original, coded, codebook, fc)
        #[arg(value_name = "DATASET", default_value = "original", value_parser = parse_dataset)]
        dataset: DatasetKind,

        /// Only show entries containing this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Only print the number of matching entries
        #[arg(long)]
        count: bool,
    },

    /// Export one dataset, or all of them, to a workbook
    Export {
        /// Dataset to export (original, coded, codebook, fc, or all)
        #[arg(value_name = "DATASET", default_value = "all", value_parser = parse_target)]
        target: ExportTarget,

        /// Directory the workbook is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "xlsx", value_parser = parse_format)]
        format: ExportFormat,
    },

    /// Replace answer texts with codebook codes
    Codify {
        /// Survey records (JSON array or workbook)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Codebook file (default: libro_codigos.json in the data directory)
        #[arg(short, long)]
        codebook: Option<PathBuf>,

        /// Output path (default: <input>_coded.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum similarity (0-1) to code an answer that is not an exact match
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
        min_score: f64,
    },

    /// Build the labeled dataset from a form definition and raw submissions
    Translate {
        /// Form definition (asset JSON with `content.survey` and `content.choices`)
        #[arg(value_name = "FORM")]
        form: PathBuf,

        /// Submissions (JSON array, or an object with a `results` array)
        #[arg(value_name = "SUBMISSIONS")]
        submissions: PathBuf,

        /// Output path (default: the original dataset file in the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert the first sheet of a workbook to a JSON record array
    Import {
        /// Workbook to read (xlsx, xls, ods)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Output path (default: <workbook>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which datasets load and how many rows they hold
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_dataset(s: &str) -> Result<DatasetKind, String> {
    s.parse().map_err(|e: EncuestaError| e.to_string())
}

fn parse_target(s: &str) -> Result<ExportTarget, String> {
    s.parse().map_err(|e: EncuestaError| e.to_string())
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: EncuestaError| e.to_string())
}
