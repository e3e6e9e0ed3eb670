//! Show command - print a dataset as cards.

use colored::Colorize;
use encuesta::{Card, DatasetKind, Session};

use super::SourceArgs;

pub fn run(
    source: &SourceArgs,
    dataset: DatasetKind,
    filter: &str,
    count_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new();
    let report = session.load(&source.file_source()?, &[dataset]);

    for (kind, message) in &report.failed {
        eprintln!(
            "{} {} could not be loaded: {}",
            "Warning:".yellow().bold(),
            kind,
            message
        );
    }

    let cards = session.cards(dataset, filter);
    let total = session.row_count(dataset);

    if !count_only {
        for card in &cards {
            print_card(card);
        }
    }

    if filter.is_empty() {
        println!("{} {}", cards.len().to_string().white().bold(), "entries".dimmed());
    } else {
        println!(
            "{} of {} {} matching \"{}\"",
            cards.len().to_string().white().bold(),
            total,
            "entries".dimmed(),
            filter
        );
    }

    Ok(())
}

fn print_card(card: &Card) {
    println!("{}", card.title.cyan().bold());
    if let Some(subtitle) = &card.subtitle {
        println!("  {}", subtitle.italic());
    }
    for line in &card.lines {
        match line.split_once(": ") {
            Some((key, value)) => println!("  {}: {}", key.bold(), value),
            None => println!("  {}", line),
        }
    }
    println!();
}
