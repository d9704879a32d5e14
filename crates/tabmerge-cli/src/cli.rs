//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use tabmerge::{JoinType, MappingEntry, OutputFormat};

/// tabmerge: combine CSV/TSV files by stacking rows or joining on a key
#[derive(Parser)]
#[command(name = "tabmerge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stack the rows of every file under one unified header
    Append {
        /// Input files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Do not add the provenance column
        #[arg(long, conflicts_with = "source_column")]
        no_source_column: bool,

        /// Name of the provenance column
        #[arg(long, default_value = tabmerge::schema::DEFAULT_PROVENANCE_COLUMN)]
        source_column: String,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Combine files on a key column
    Join {
        /// Input files, in merge order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Key column (case-insensitive); overrides the spec file
        #[arg(short, long)]
        key: Option<String>,

        /// Join type; overrides the spec file [default: left]
        #[arg(long)]
        how: Option<JoinType>,

        /// Rename a column: SRC:COLUMN=OUTPUT, where SRC is the 0-based file position
        #[arg(long = "map", value_name = "SRC:COLUMN=OUTPUT", value_parser = parse_mapping)]
        mappings: Vec<MappingEntry>,

        /// JSON join spec (key_column, join_type, column_mapping)
        #[arg(long, value_name = "FILE")]
        spec: Option<PathBuf>,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Show each file's columns and row count
    Inspect {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Force a delimiter (tab, comma, semicolon, pipe, or a single character)
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Input and output options shared by the merge commands.
#[derive(Args)]
pub struct IoArgs {
    /// Output path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else csv)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Force an input delimiter (tab, comma, semicolon, pipe, or a single character)
    #[arg(short, long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Print the merge report as JSON on stderr
    #[arg(long)]
    pub report_json: bool,
}

/// Parse `SRC:COLUMN=OUTPUT`.
pub fn parse_mapping(s: &str) -> Result<MappingEntry, String> {
    let (source, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid mapping '{}': expected SRC:COLUMN=OUTPUT", s))?;
    let (column, output) = rest
        .rsplit_once('=')
        .ok_or_else(|| format!("Invalid mapping '{}': expected SRC:COLUMN=OUTPUT", s))?;
    let source = source
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid mapping '{}': SRC must be a file position", s))?;

    if column.trim().is_empty() || output.trim().is_empty() {
        return Err(format!("Invalid mapping '{}': empty column name", s));
    }

    Ok(MappingEntry {
        source,
        column: column.to_string(),
        output: output.to_string(),
    })
}

/// Parse a delimiter name or single character.
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.to_lowercase().as_str() {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        _ => Err(format!(
            "Invalid delimiter: {}. Use tab, comma, semicolon, pipe, or a single character.",
            s
        )),
    }
}
