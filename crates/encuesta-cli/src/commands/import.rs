//! Import command - convert a workbook's first sheet to JSON records.

use std::path::PathBuf;

use colored::Colorize;
use encuesta::import_workbook;
use encuesta::source::write_records;

use super::sibling_json;

pub fn run(workbook: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.unwrap_or_else(|| sibling_json(&workbook, ""));

    let records = import_workbook(&workbook)?;
    write_records(&output, &records)?;

    println!(
        "{} {} records from {}",
        "Imported".green().bold(),
        records.len().to_string().white().bold(),
        workbook.display()
    );
    println!("{} {}", "Saved".green().bold(), output.display());

    Ok(())
}
