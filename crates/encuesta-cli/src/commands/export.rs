//! Export command - write datasets to a workbook.

use std::path::PathBuf;

use colored::Colorize;
use encuesta::{EncuestaError, ExportConfig, ExportFormat, ExportTarget, Session};

use super::SourceArgs;

pub fn run(
    source: &SourceArgs,
    target: ExportTarget,
    output_dir: PathBuf,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExportConfig::default()
        .with_output_dir(output_dir)
        .with_format(format);

    let mut session = Session::new();
    let report = session.load(&source.file_source()?, &target.datasets());
    for (kind, message) in &report.failed {
        eprintln!(
            "{} {} not loaded, exporting without it: {}",
            "Warning:".yellow().bold(),
            kind,
            message
        );
    }

    let writer = config.writer();
    match session.export(target, writer.as_ref(), &config.output_dir) {
        Ok(paths) => {
            for path in paths {
                println!("{} {}", "Saved".green().bold(), path.display());
            }
            Ok(())
        }
        Err(EncuestaError::EmptyExport(notice)) => {
            eprintln!("{}", notice.yellow());
            Err("nothing was exported".into())
        }
        Err(e) => Err(e.into()),
    }
}
