//! Translate command - label raw submissions using the form definition.

use std::path::PathBuf;

use colored::Colorize;
use encuesta::source::write_records;
use encuesta::{DatasetKind, FormStructure, read_submissions, translate_records};

use super::SourceArgs;

pub fn run(
    source: &SourceArgs,
    form: PathBuf,
    submissions: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = match output {
        Some(path) => path,
        None => source.source_config()?.resource_path(DatasetKind::Original),
    };

    let structure = FormStructure::load(&form)?;
    if structure.question_count() == 0 {
        return Err(format!("No labeled questions found in {}", form.display()).into());
    }

    let raw = read_submissions(&submissions)?;
    let records = translate_records(&raw, &structure);
    write_records(&output, &records)?;

    println!(
        "{} {} submissions ({} questions, {} choices)",
        "Translated".green().bold(),
        records.len().to_string().white().bold(),
        structure.question_count(),
        structure.choice_count()
    );
    println!("{} {}", "Saved".green().bold(), output.display());

    Ok(())
}
