//! Encuesta CLI - browse, filter and export survey datasets.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbose(cli.verbose));

    let source = commands::SourceArgs {
        data_dir: cli.data_dir,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Show {
            dataset,
            filter,
            count,
        } => commands::show::run(&source, dataset, &filter, count),

        Commands::Export {
            target,
            output_dir,
            format,
        } => commands::export::run(&source, target, output_dir, format),

        Commands::Codify {
            input,
            codebook,
            output,
            min_score,
        } => commands::codify::run(&source, input, codebook, output, min_score),

        Commands::Translate {
            form,
            submissions,
            output,
        } => commands::translate::run(&source, form, submissions, output),

        Commands::Import { workbook, output } => commands::import::run(workbook, output),

        Commands::Status { json } => commands::status::run(&source, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
