//! tabmerge CLI - merge CSV/TSV files by appending rows or joining on a key.

mod cli;
mod commands;
mod logging;
mod workbook;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Append {
            files,
            no_source_column,
            source_column,
            io,
        } => commands::append::run(files, no_source_column, source_column, io),

        Commands::Join {
            files,
            key,
            how,
            mappings,
            spec,
            io,
        } => commands::join::run(files, key, how, mappings, spec, io),

        Commands::Inspect {
            files,
            delimiter,
            json,
        } => commands::inspect::run(files, delimiter, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
