//! Merge output and the audit report that accompanies it.

use serde::{Deserialize, Serialize};

use super::spec::JoinType;
use crate::input::Table;
use crate::schema::UnifiedHeader;

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Rows stacked under a unified header.
    Append,
    /// Rows combined per key.
    Join { join_type: JoinType },
}

/// Row, column, and match counts for one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Strategy used.
    pub strategy: MergeStrategy,
    /// Rows in the output.
    pub total_rows: usize,
    /// Columns in the output header.
    pub column_count: usize,
    /// Output rows whose key was present in every source.
    pub fully_matched_rows: usize,
    /// Output rows whose key was missing from at least one source.
    pub partially_matched_rows: usize,
    /// Number of sources merged.
    pub source_count: usize,
    /// Source rows replaced by a later row with the same key.
    #[serde(default)]
    pub duplicate_keys: usize,
    /// Source rows skipped because their key cell was empty.
    #[serde(default)]
    pub blank_keys: usize,
}

impl MergeReport {
    /// Report for an append merge: every row counts as matched.
    pub fn for_append(total_rows: usize, column_count: usize, source_count: usize) -> Self {
        Self {
            strategy: MergeStrategy::Append,
            total_rows,
            column_count,
            fully_matched_rows: total_rows,
            partially_matched_rows: 0,
            source_count,
            duplicate_keys: 0,
            blank_keys: 0,
        }
    }

    /// Fraction of output rows that were fully matched (1.0 when empty).
    pub fn match_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }
        self.fully_matched_rows as f64 / self.total_rows as f64
    }
}

/// A merged grid plus its report.
///
/// Rows are aligned to `header`: each has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedResult {
    /// Output columns.
    pub header: UnifiedHeader,
    /// Output rows.
    pub rows: Vec<Vec<String>>,
    /// Counts describing the merge.
    pub report: MergeReport,
}

impl MergedResult {
    /// Number of output rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of output columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(String::as_str))
    }

    /// Values of the column equivalent to `name`.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.header.position(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Convert into a plain table, dropping the report.
    pub fn into_table(self) -> Table {
        Table::new(self.header.into_names(), self.rows)
    }
}
