//! Join command - combine files on a key column.

use std::path::{Path, PathBuf};

use tabmerge::{JoinSpec, JoinType, MappingEntry, MergeConfig, Merger};
use tracing::{info, warn};

use super::{ensure_files_exist, parser_config, print_report, write_output};
use crate::cli::IoArgs;
use crate::workbook::CalamineReader;

pub fn run(
    files: Vec<PathBuf>,
    key: Option<String>,
    how: Option<JoinType>,
    mappings: Vec<MappingEntry>,
    spec: Option<PathBuf>,
    io: IoArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_files_exist(&files)?;

    let spec = build_spec(key, how, mappings, spec.as_deref())?;

    if let Some(mapping) = spec.mapping() {
        for entry in mapping.entries().filter(|e| e.source >= files.len()) {
            warn!(
                source = entry.source,
                column = %entry.column,
                "Mapping refers to a file position that was not given"
            );
        }
    }

    let merger = Merger::with_config(MergeConfig {
        parser: parser_config(io.delimiter),
        ..MergeConfig::default()
    })
    .with_workbook_reader(CalamineReader);

    info!(
        files = files.len(),
        key = %spec.key_column,
        join_type = %spec.join_type,
        "Joining sources"
    );
    let result = merger.join_files(&files, &spec)?;

    write_output(&result, &io)?;
    print_report(&result.report, io.report_json)?;

    Ok(())
}

/// Combine an optional spec file with command-line overrides.
///
/// `--key` and `--how` replace the file's values; `--map` entries are added
/// to its mapping, replacing entries for the same source column.
fn build_spec(
    key: Option<String>,
    how: Option<JoinType>,
    mappings: Vec<MappingEntry>,
    spec_path: Option<&Path>,
) -> Result<JoinSpec, Box<dyn std::error::Error>> {
    let mut spec = match spec_path {
        Some(path) => JoinSpec::load(path)?,
        None => {
            let key = key
                .clone()
                .ok_or("A key column is required: pass --key or --spec")?;
            JoinSpec::new(key, JoinType::default())
        }
    };

    if let Some(key) = key {
        spec.key_column = key;
    }
    if let Some(how) = how {
        spec.join_type = how;
    }

    if !mappings.is_empty() {
        let mut mapping = spec.column_mapping.take().unwrap_or_default();
        for entry in mappings {
            mapping.insert(entry.source, entry.column, entry.output);
        }
        spec.column_mapping = Some(mapping);
    }

    Ok(spec)
}
