//! Codify command - replace answer texts with codebook codes.

use std::path::PathBuf;

use colored::Colorize;
use encuesta::source::{read_codebook, read_records, write_records};
use encuesta::{DatasetKind, codify_records_with};

use super::{SourceArgs, sibling_json};

pub fn run(
    source: &SourceArgs,
    input: PathBuf,
    codebook: Option<PathBuf>,
    output: Option<PathBuf>,
    min_score: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let codebook_path = match codebook {
        Some(path) => path,
        None => source.source_config()?.resource_path(DatasetKind::Codebook),
    };
    let output = output.unwrap_or_else(|| sibling_json(&input, "_coded"));

    println!("{} {}", "Codifying".cyan().bold(), input.display());

    let records = read_records(&input)?;
    let codebook = read_codebook(&codebook_path)?;
    if codebook.is_empty() {
        return Err(format!("Codebook is empty: {}", codebook_path.display()).into());
    }

    let (coded, report) = codify_records_with(&records, &codebook, min_score);
    write_records(&output, &coded)?;

    println!("  Records:         {}", coded.len().to_string().white().bold());
    println!("  Coded values:    {}", report.coded.to_string().green());
    println!("  Approximate:     {}", report.approximate.to_string().blue());
    println!("  Unmatched:       {}", report.unmatched.to_string().yellow());
    println!("  Not in codebook: {}", report.passed_through.to_string().dimmed());

    if !report.low_confidence.is_empty() {
        println!();
        println!("{}", "Low confidence (kept as is):".yellow().bold());
        for m in &report.low_confidence {
            println!(
                "  {}: '{}' -> '{}' ({:.0}%)",
                m.field,
                m.value,
                m.best,
                m.score * 100.0
            );
        }
    }

    println!();
    println!("{} {}", "Saved".green().bold(), output.display());

    Ok(())
}
