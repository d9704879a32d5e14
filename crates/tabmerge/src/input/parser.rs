//! Source ingestion: delimited text and decoded workbooks into tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use super::source::{Source, SourceMetadata, Table};
use super::workbook::{Workbook, WorkbookReader};
use crate::error::{IngestFailure, MergeError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Non-blank lines inspected when detecting a delimiter.
const SNIFF_LINES: usize = 10;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Format hint for a raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// CSV, TSV and friends.
    Delimited,
    /// A spreadsheet container decoded by a [`WorkbookReader`].
    Spreadsheet,
}

impl SourceFormat {
    /// Guess the format from a file extension. Unknown extensions are
    /// treated as delimited text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => SourceFormat::Spreadsheet,
            _ => SourceFormat::Delimited,
        }
    }
}

/// Undecoded bytes of one source plus what is needed to decode them.
#[derive(Debug, Clone)]
pub struct RawSource {
    /// Origin label carried into the merged output.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// How to decode `bytes`.
    pub format: SourceFormat,
    /// Sheet to read for spreadsheet sources (None = first sheet).
    pub sheet: Option<String>,
}

impl RawSource {
    /// A delimited-text source.
    pub fn delimited(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            format: SourceFormat::Delimited,
            sheet: None,
        }
    }

    /// A spreadsheet-container source.
    pub fn spreadsheet(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            format: SourceFormat::Spreadsheet,
            sheet: None,
        }
    }

    /// Select a sheet by name.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Maximum data rows to read per source (None = all).
    pub max_rows: Option<usize>,
    /// Trim surrounding whitespace from header cells.
    pub trim_header_cells: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            max_rows: None,
            trim_header_cells: false,
        }
    }
}

/// Turns raw sources into [`Source`] values.
#[derive(Clone)]
pub struct Parser {
    config: ParserConfig,
    workbook_reader: Option<Arc<dyn WorkbookReader>>,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            workbook_reader: None,
        }
    }

    /// Enable spreadsheet sources by plugging in a container decoder.
    pub fn with_workbook_reader(mut self, reader: impl WorkbookReader + 'static) -> Self {
        self.workbook_reader = Some(Arc::new(reader));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read and ingest a file, returning the source and its metadata.
    ///
    /// The source is named after the file name.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Source, SourceMetadata)> {
        self.parse_file_with_sheet(path, None)
    }

    /// Like [`Parser::parse_file`], selecting a sheet for spreadsheet files.
    pub fn parse_file_with_sheet(
        &self,
        path: impl AsRef<Path>,
        sheet: Option<&str>,
    ) -> Result<(Source, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| MergeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| MergeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let format = SourceFormat::from_path(path);
        let format_label = match format {
            SourceFormat::Delimited => {
                let delimiter = self
                    .config
                    .delimiter
                    .unwrap_or_else(|| detect_delimiter(strip_bom(&contents), self.config.quote));
                delimiter_label(delimiter).to_string()
            }
            SourceFormat::Spreadsheet => "spreadsheet".to_string(),
        };

        let raw = RawSource {
            name,
            bytes: contents,
            format,
            sheet: sheet.map(str::to_string),
        };
        let source = self.ingest(&raw)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format_label,
            source.table.row_count(),
            source.table.column_count(),
        );

        Ok((source, metadata))
    }

    /// Ingest one raw source.
    pub fn ingest(&self, raw: &RawSource) -> Result<Source> {
        match raw.format {
            SourceFormat::Delimited => {
                let bytes = strip_bom(&raw.bytes);
                let delimiter = self
                    .config
                    .delimiter
                    .unwrap_or_else(|| detect_delimiter(bytes, self.config.quote));
                let table = self.parse_delimited(&raw.name, bytes, delimiter)?;
                tracing::debug!(
                    source = %raw.name,
                    rows = table.row_count(),
                    columns = table.column_count(),
                    delimiter = delimiter_label(delimiter),
                    "Ingested delimited source"
                );
                Ok(Source::new(raw.name.clone(), table))
            }
            SourceFormat::Spreadsheet => {
                let reader = self.workbook_reader.as_ref().ok_or_else(|| {
                    MergeError::UnsupportedFormat(format!(
                        "'{}' is a spreadsheet but no workbook reader is configured",
                        raw.name
                    ))
                })?;
                let workbook = reader
                    .read_workbook(&raw.bytes)
                    .map_err(|detail| MergeError::malformed(&raw.name, detail))?;
                self.ingest_workbook(&raw.name, &workbook, raw.sheet.as_deref())
            }
        }
    }

    /// Ingest independent sources concurrently, preserving input order.
    ///
    /// If several sources fail, the error of the earliest one is returned.
    pub fn ingest_all(&self, raws: &[RawSource]) -> Result<Vec<Source>> {
        map_in_order(raws, |raw| self.ingest(raw))
    }

    /// Read and ingest files concurrently, preserving input order.
    pub fn parse_files<P>(&self, paths: &[P]) -> Result<Vec<(Source, SourceMetadata)>>
    where
        P: AsRef<Path> + Sync,
    {
        map_in_order(paths, |path| self.parse_file(path))
    }

    /// Ingest one sheet of an already decoded workbook.
    pub fn ingest_workbook(
        &self,
        name: &str,
        workbook: &Workbook,
        sheet: Option<&str>,
    ) -> Result<Source> {
        let (sheet_name, records) = match sheet {
            Some(wanted) => workbook.sheet(wanted).ok_or_else(|| {
                MergeError::ingest(
                    name,
                    IngestFailure::MissingSheet {
                        sheet: wanted.to_string(),
                    },
                )
            })?,
            None => workbook
                .first_sheet()
                .ok_or_else(|| MergeError::ingest(name, IngestFailure::EmptySource))?,
        };

        let table = self.table_from_records(name, records.iter().cloned())?;
        tracing::debug!(
            source = %name,
            sheet = %sheet_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Ingested workbook sheet"
        );

        Ok(Source::new(name, table).with_sheet_label(sheet_name))
    }

    /// Build a table from records: the first is the header, the rest are rows.
    ///
    /// Trailing records with only blank cells are dropped, and every row is
    /// fitted to the header width.
    pub fn table_from_records(
        &self,
        name: &str,
        records: impl IntoIterator<Item = Vec<String>>,
    ) -> Result<Table> {
        let mut records = records.into_iter();
        let mut headers = records
            .next()
            .ok_or_else(|| MergeError::ingest(name, IngestFailure::EmptySource))?;

        let mut rows: Vec<Vec<String>> = match self.config.max_rows {
            Some(max) => records.take(max).collect(),
            None => records.collect(),
        };
        while rows.last().is_some_and(|row| is_blank_record(row)) {
            rows.pop();
        }

        if rows.is_empty() && is_blank_record(&headers) {
            return Err(MergeError::ingest(name, IngestFailure::EmptySource));
        }

        if self.config.trim_header_cells {
            for header in &mut headers {
                *header = header.trim().to_string();
            }
        }

        Ok(Table::new(headers, rows))
    }

    /// Parse delimited bytes with a known delimiter.
    fn parse_delimited(&self, name: &str, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        let limit = self.config.max_rows.map(|max| max + 1);
        for result in reader.records() {
            if limit.is_some_and(|limit| records.len() >= limit) {
                break;
            }
            let record = result.map_err(|e| MergeError::malformed(name, e.to_string()))?;
            records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
        }

        self.table_from_records(name, records)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `f` to every item on the rayon pool and collect results in input
/// order. The first error in input order wins.
fn map_in_order<I, T, F>(items: &[I], f: F) -> Result<Vec<T>>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T> + Sync + Send,
{
    let results: Vec<Result<T>> = items.par_iter().map(f).collect();
    results.into_iter().collect()
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

fn is_blank_record(record: &[String]) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

fn delimiter_label(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Pick the candidate delimiter whose field count on the first line is
/// repeated by the most sample lines, then the one splitting the first line
/// most. Earlier candidates win ties, so tab beats comma. Defaults to a comma.
fn detect_delimiter(bytes: &[u8], quote: u8) -> u8 {
    let sample: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .take(SNIFF_LINES)
        .collect();

    let mut best = (b',', (0usize, 0usize));
    for &candidate in DELIMITERS {
        let mut counts = sample
            .iter()
            .map(|line| unquoted_occurrences(line, candidate, quote));
        let Some(header) = counts.next().filter(|&n| n > 0) else {
            continue;
        };
        let agreeing = counts.filter(|&n| n == header).count();

        if (agreeing, header) > best.1 {
            best = (candidate, (agreeing, header));
        }
    }

    best.0
}

/// Occurrences of `needle` outside `quote`-delimited spans.
fn unquoted_occurrences(line: &[u8], needle: u8, quote: u8) -> usize {
    line.iter()
        .scan(false, |quoted, &b| {
            if b == quote {
                *quoted = !*quoted;
            }
            Some(b == needle && !*quoted)
        })
        .filter(|&hit| hit)
        .count()
}
