//! Manual column re-mapping for the join strategy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::ColumnKey;

/// One `(source, column) -> output` rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Zero-based position of the source in the merge call.
    pub source: usize,
    /// Column name as it appears in that source.
    pub column: String,
    /// Column name in the merged output.
    pub output: String,
}

/// Rename table from `(source index, source column)` to output column.
///
/// Source columns are matched after trimming and lowercasing. A lookup
/// miss passes the column through under its own name. Entries naming a
/// source or column that does not exist are never consulted, so they are
/// harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MappingEntry>", into = "Vec<MappingEntry>")]
pub struct ColumnMapping {
    entries: IndexMap<(usize, ColumnKey), MappingEntry>,
}

impl ColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rename (builder style).
    pub fn with(
        mut self,
        source: usize,
        column: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.insert(source, column, output);
        self
    }

    /// Add a rename. A later entry for the same source column replaces the
    /// earlier one but keeps its position.
    pub fn insert(&mut self, source: usize, column: impl Into<String>, output: impl Into<String>) {
        let column = column.into();
        let key = (source, ColumnKey::new(&column));
        self.entries.insert(
            key,
            MappingEntry {
                source,
                column,
                output: output.into(),
            },
        );
    }

    /// The explicit rename for a source column, if any.
    pub fn lookup(&self, source: usize, column: &str) -> Option<&str> {
        self.entries
            .get(&(source, ColumnKey::new(column)))
            .map(|entry| entry.output.as_str())
    }

    /// Output name for a source column: the rename, or the column itself.
    pub fn resolve<'a>(&'a self, source: usize, column: &'a str) -> &'a str {
        self.lookup(source, column).unwrap_or(column)
    }

    /// Target names in insertion order (may repeat).
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.output.as_str())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<MappingEntry>> for ColumnMapping {
    fn from(entries: Vec<MappingEntry>) -> Self {
        let mut mapping = ColumnMapping::new();
        for entry in entries {
            mapping.insert(entry.source, entry.column, entry.output);
        }
        mapping
    }
}

impl From<ColumnMapping> for Vec<MappingEntry> {
    fn from(mapping: ColumnMapping) -> Self {
        mapping.entries.into_values().collect()
    }
}
