//! Encoding merged grids into output formats.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{MergeError, Result};
use crate::merge::MergedResult;

/// Output encodings for a merged grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    /// Array of records keyed by column name, in header order.
    Json,
    /// A single `<table>` element.
    Html,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" | "tab" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, json, or html.", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes a header plus rows in one [`OutputFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    format: OutputFormat,
}

impl Exporter {
    /// Create an exporter for a format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a merge result.
    pub fn write_result<W: Write>(&self, result: &MergedResult, writer: W) -> Result<()> {
        self.write(result.header.names(), &result.rows, writer)
    }

    /// Write a merge result to a file.
    pub fn save(&self, result: &MergedResult, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MergeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_result(result, &mut writer)?;
        writer.flush().map_err(|e| MergeError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render a merge result into a string.
    pub fn render(&self, result: &MergedResult) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_result(result, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write any grid of strings.
    pub fn write<W: Write>(&self, header: &[String], rows: &[Vec<String>], writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Csv => write_delimited(header, rows, writer, b','),
            OutputFormat::Tsv => write_delimited(header, rows, writer, b'\t'),
            OutputFormat::Json => write_json(header, rows, writer),
            OutputFormat::Html => write_html(header, rows, writer),
        }
    }
}

fn write_delimited<W: Write>(
    header: &[String],
    rows: &[Vec<String>],
    writer: W,
    delimiter: u8,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(MergeError::Write)
}

fn write_json<W: Write>(header: &[String], rows: &[Vec<String>], writer: W) -> Result<()> {
    let records: Vec<IndexMap<&str, &str>> = rows
        .iter()
        .map(|row| {
            header
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

fn write_html<W: Write>(header: &[String], rows: &[Vec<String>], writer: W) -> Result<()> {
    let mut html = String::from("<table>\n  <thead>\n    <tr>");
    for name in header {
        html.push_str("<th>");
        html.push_str(&escape_html(name));
        html.push_str("</th>");
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        html.push_str("    <tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");

    let mut writer = writer;
    writer.write_all(html.as_bytes()).map_err(MergeError::Write)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
