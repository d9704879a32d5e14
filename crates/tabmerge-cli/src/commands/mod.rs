//! CLI command implementations.

pub mod append;
pub mod inspect;
pub mod join;

use std::error::Error;
use std::io;
use std::path::PathBuf;

use colored::Colorize;
use tabmerge::{Exporter, MergeReport, MergeStrategy, MergedResult, OutputFormat, ParserConfig};

use crate::cli::IoArgs;

/// Fail early with a readable message when an input is missing.
pub(crate) fn ensure_files_exist(files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    for file in files {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
    }
    Ok(())
}

pub(crate) fn parser_config(delimiter: Option<u8>) -> ParserConfig {
    ParserConfig {
        delimiter,
        ..ParserConfig::default()
    }
}

/// Explicit `--format`, else the output extension, else CSV.
pub(crate) fn resolve_format(io: &IoArgs) -> OutputFormat {
    io.format
        .or_else(|| io.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default()
}

/// Write the merged table to `--output`, or to stdout.
pub(crate) fn write_output(result: &MergedResult, io: &IoArgs) -> Result<(), Box<dyn Error>> {
    let exporter = Exporter::new(resolve_format(io));

    match &io.output {
        Some(path) => {
            exporter.save(result, path)?;
            eprintln!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => exporter.write_result(result, io::stdout().lock())?,
    }

    Ok(())
}

/// Print the merge report on stderr.
pub(crate) fn print_report(report: &MergeReport, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        eprintln!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let strategy = match report.strategy {
        MergeStrategy::Append => "append".to_string(),
        MergeStrategy::Join { join_type } => format!("{} join", join_type),
    };

    eprintln!(
        "{} {} sources ({})",
        "Merged".green().bold(),
        report.source_count.to_string().white().bold(),
        strategy
    );
    eprintln!("  Rows:              {}", report.total_rows.to_string().white());
    eprintln!("  Columns:           {}", report.column_count.to_string().white());

    if let MergeStrategy::Join { .. } = report.strategy {
        eprintln!(
            "  Fully matched:     {} ({:.0}%)",
            report.fully_matched_rows.to_string().green(),
            report.match_rate() * 100.0
        );
        eprintln!(
            "  Partially matched: {}",
            report.partially_matched_rows.to_string().yellow()
        );

        if report.duplicate_keys > 0 {
            eprintln!(
                "{} {} rows replaced by a later row with the same key",
                "warning:".yellow().bold(),
                report.duplicate_keys
            );
        }
        if report.blank_keys > 0 {
            eprintln!(
                "{} {} rows skipped because their key was empty",
                "warning:".yellow().bold(),
                report.blank_keys
            );
        }
    }

    Ok(())
}
