//! Status command - show which datasets load and their sizes.

use colored::Colorize;
use encuesta::Session;

use super::SourceArgs;

pub fn run(source: &SourceArgs, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file_source = source.file_source()?;
    let mut session = Session::new();
    let report = session.load_all(&file_source);

    if json_output {
        let status = serde_json::json!({
            "data_dir": file_source.config().data_dir,
            "complete": report.is_complete(),
            "failed": report
                .failed
                .iter()
                .map(|(kind, error)| serde_json::json!({ "dataset": kind, "error": error }))
                .collect::<Vec<_>>(),
            "datasets": session.status(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Datasets in".cyan().bold(),
        file_source.config().data_dir.display().to_string().white()
    );
    println!();

    for slot in session.status() {
        let resource = file_source.config().resource(slot.dataset);
        match &slot.source {
            Some(meta) => println!(
                "  {:<9} {:>6} rows  {}  {}",
                slot.dataset.to_string().bold(),
                slot.rows,
                resource,
                meta.hash[..19.min(meta.hash.len())].dimmed()
            ),
            None => println!(
                "  {:<9} {:>6}       {}  {}",
                slot.dataset.to_string().bold(),
                "-",
                resource,
                "not loaded".red()
            ),
        }
    }

    if !report.is_complete() {
        println!();
        println!("{}", "Errors:".yellow().bold());
        for (kind, error) in &report.failed {
            println!("  {}: {}", kind, error);
        }
    }

    Ok(())
}
