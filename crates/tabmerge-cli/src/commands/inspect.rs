//! Inspect command - show the columns and size of each file.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tabmerge::schema::union_headers;
use tabmerge::{Parser, Source, SourceMetadata};

use super::{ensure_files_exist, parser_config};
use crate::workbook::CalamineReader;

#[derive(Serialize)]
struct FileSummary<'a> {
    #[serde(flatten)]
    metadata: &'a SourceMetadata,
    headers: &'a [String],
}

pub fn run(
    files: Vec<PathBuf>,
    delimiter: Option<u8>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_files_exist(&files)?;

    let parser =
        Parser::with_config(parser_config(delimiter)).with_workbook_reader(CalamineReader);
    let (sources, metadata): (Vec<Source>, Vec<SourceMetadata>) =
        parser.parse_files(&files)?.into_iter().unzip();

    if json {
        let summaries: Vec<FileSummary<'_>> = sources
            .iter()
            .zip(&metadata)
            .map(|(source, metadata)| FileSummary {
                metadata,
                headers: &source.table.headers,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for (source, meta) in sources.iter().zip(&metadata) {
        println!(
            "{} {}",
            "File:".cyan().bold(),
            meta.path.display().to_string().white()
        );
        println!("  Format:  {}", meta.format);
        println!("  Size:    {} bytes", meta.size_bytes);
        println!("  Rows:    {}", meta.row_count);
        println!("  Columns: {}", meta.column_count);
        println!("  SHA-256: {}", meta.hash.dimmed());
        for (i, header) in source.table.headers.iter().enumerate() {
            println!("    {:>3}  {}", i + 1, header);
        }
        println!();
    }

    if sources.len() > 1 {
        let unified = union_headers(&sources);
        let shared: Vec<&str> = unified
            .iter()
            .filter(|name| {
                sources
                    .iter()
                    .all(|s| s.table.find_column(name).is_some())
            })
            .collect();

        println!(
            "{} {} columns after append",
            "Unified header:".yellow().bold(),
            unified.len()
        );
        if shared.is_empty() {
            println!("  {}", "No column is shared by every file".yellow());
        } else {
            println!("  Shared by every file: {}", shared.join(", ").green());
        }
    }

    Ok(())
}
