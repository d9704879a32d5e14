//! Tabular sources and their metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnKey;

/// Metadata about a source file that was ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was ingested.
    pub ingested_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been ingested.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            ingested_at: Utc::now(),
        }
    }
}

/// Header plus rows of string cells.
///
/// Every row has exactly `headers.len()` cells. [`Table::new`] pads short
/// rows with empty strings and truncates long ones, and deserialization
/// goes through it too. The fields are public, so code reading a table
/// still treats a missing cell as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TableParts")]
pub struct Table {
    /// Column headers. Names need not be unique.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct TableParts {
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl From<TableParts> for Table {
    fn from(parts: TableParts) -> Self {
        Table::new(parts.headers, parts.rows)
    }
}

impl Table {
    /// Create a table, fitting every row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Position of the first header matching `name` after trimming and
    /// lowercasing both sides.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = ColumnKey::new(name);
        self.headers.iter().position(|h| ColumnKey::new(h) == wanted)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(String::as_str))
    }
}

/// A named table handed to the merge engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Origin label, typically the file name.
    pub name: String,
    /// The ingested table. Never mutated by a merge.
    pub table: Table,
    /// Sheet the table was read from, for spreadsheet sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_label: Option<String>,
}

impl Source {
    /// Create a source without a sheet label.
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
            sheet_label: None,
        }
    }

    /// Set the sheet label.
    pub fn with_sheet_label(mut self, sheet: impl Into<String>) -> Self {
        self.sheet_label = Some(sheet.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_pads_and_truncates_rows() {
        let table = Table::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );

        assert_eq!(table.rows[0], strings(&["1", "", ""]));
        assert_eq!(table.rows[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_deserialize_fits_rows_to_header() {
        let table: Table =
            serde_json::from_str(r#"{"headers":["v","id"],"rows":[["x"],["a","b","c"]]}"#)
                .unwrap();
        assert_eq!(table.rows, vec![strings(&["x", ""]), strings(&["a", "b"])]);

        let header_only: Table = serde_json::from_str(r#"{"headers":["id"]}"#).unwrap();
        assert_eq!(header_only.row_count(), 0);
    }

    #[test]
    fn test_find_column_ignores_case_and_whitespace() {
        let table = Table::new(strings(&["ID", " Customer Name "]), vec![]);

        assert_eq!(table.find_column("id"), Some(0));
        assert_eq!(table.find_column("customer name"), Some(1));
        assert_eq!(table.find_column("email"), None);
    }

    #[test]
    fn test_column_values() {
        let table = Table::new(
            strings(&["k", "v"]),
            vec![strings(&["a", "1"]), strings(&["b", "2"])],
        );
        let values: Vec<&str> = table.column_values(1).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(table.get(1, 0), Some("b"));
        assert_eq!(table.get(2, 0), None);
    }

    #[test]
    fn test_source_sheet_label() {
        let source = Source::new("book.xlsx", Table::default()).with_sheet_label("Q1");
        assert_eq!(source.sheet_label.as_deref(), Some("Q1"));
    }
}
