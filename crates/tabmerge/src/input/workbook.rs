//! Decoded spreadsheet containers.
//!
//! The bytes of a spreadsheet container (xlsx, ods, ...) are decoded by a
//! [`WorkbookReader`] supplied by the caller. The ingester only sees the
//! resulting [`Workbook`]: an ordered list of sheets, each a list of
//! string records.

use indexmap::IndexMap;

use crate::schema::ColumnKey;

/// Ordered sheets of string records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: IndexMap<String, Vec<Vec<String>>>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, keeping insertion order. A sheet with the same name is replaced.
    pub fn with_sheet(mut self, name: impl Into<String>, records: Vec<Vec<String>>) -> Self {
        self.sheets.insert(name.into(), records);
        self
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// True if the workbook has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// The first sheet, if any.
    pub fn first_sheet(&self) -> Option<(&str, &[Vec<String>])> {
        self.sheets
            .first()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Look up a sheet by name, ignoring case and surrounding whitespace.
    pub fn sheet(&self, name: &str) -> Option<(&str, &[Vec<String>])> {
        if let Some((key, records)) = self.sheets.get_key_value(name) {
            return Some((key.as_str(), records.as_slice()));
        }
        let wanted = ColumnKey::new(name);
        self.sheets
            .iter()
            .find(|(sheet, _)| ColumnKey::new(sheet) == wanted)
            .map(|(sheet, records)| (sheet.as_str(), records.as_slice()))
    }
}

/// Decodes a spreadsheet container into a [`Workbook`].
///
/// Implementations wrap whatever format library the host uses. The error
/// string becomes the detail of a `malformed-source` ingest failure.
pub trait WorkbookReader: Send + Sync {
    /// Decode container bytes.
    fn read_workbook(&self, bytes: &[u8]) -> std::result::Result<Workbook, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sheet_lookup_is_case_insensitive() {
        let workbook = Workbook::new()
            .with_sheet("Summary", vec![record(&["a"])])
            .with_sheet("Q1 Sales", vec![record(&["b"])]);

        let (name, records) = workbook.sheet(" q1 sales ").unwrap();
        assert_eq!(name, "Q1 Sales");
        assert_eq!(records[0], record(&["b"]));
        assert!(workbook.sheet("Q2").is_none());
    }

    #[test]
    fn test_first_sheet_follows_insertion_order() {
        let workbook = Workbook::new()
            .with_sheet("Zeta", vec![])
            .with_sheet("Alpha", vec![]);

        assert_eq!(workbook.first_sheet().map(|(n, _)| n), Some("Zeta"));
        assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
        assert_eq!(workbook.len(), 2);
    }
}
