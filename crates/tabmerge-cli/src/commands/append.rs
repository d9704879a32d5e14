//! Append command - stack rows of every file under one header.

use std::path::PathBuf;

use tabmerge::{MergeConfig, Merger, ProvenanceConfig};
use tracing::info;

use super::{ensure_files_exist, parser_config, print_report, write_output};
use crate::cli::IoArgs;
use crate::workbook::CalamineReader;

pub fn run(
    files: Vec<PathBuf>,
    no_source_column: bool,
    source_column: String,
    io: IoArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_files_exist(&files)?;

    let provenance = if no_source_column {
        ProvenanceConfig::disabled()
    } else {
        ProvenanceConfig::named(source_column)
    };
    let merger = Merger::with_config(MergeConfig {
        parser: parser_config(io.delimiter),
        provenance,
    })
    .with_workbook_reader(CalamineReader);

    info!(files = files.len(), "Appending sources");
    let result = merger.append_files(&files)?;

    write_output(&result, &io)?;
    print_report(&result.report, io.report_json)?;

    Ok(())
}
