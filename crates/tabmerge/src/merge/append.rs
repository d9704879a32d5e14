//! Append strategy: stack every source's rows under one header.

use super::report::{MergeReport, MergedResult};
use crate::input::Source;
use crate::schema::{ProvenanceConfig, SchemaUnifier, UnifiedHeader};

/// Stacks rows of all sources under a unified header.
///
/// Rows keep source order, then original order. No row deduplication.
#[derive(Debug, Clone, Default)]
pub struct AppendMerger {
    unifier: SchemaUnifier,
}

impl AppendMerger {
    /// Create a merger with the given provenance settings.
    pub fn new(provenance: ProvenanceConfig) -> Self {
        Self {
            unifier: SchemaUnifier::new(provenance),
        }
    }

    /// Stack the rows of `sources`. An empty slice yields an empty result.
    pub fn merge(&self, sources: &[Source]) -> MergedResult {
        let schema = self.unifier.unify(sources);
        let width = schema.header.len();
        let total: usize = sources.iter().map(|s| s.table.row_count()).sum();

        let mut rows = Vec::with_capacity(total);
        for source in sources {
            let col_map = column_map(&schema.header, &source.table.headers);

            for row in &source.table.rows {
                let mut output = vec![String::new(); width];
                for (cell, target) in row.iter().zip(&col_map) {
                    if let Some(position) = *target {
                        output[position].clone_from(cell);
                    }
                }
                if let Some(position) = schema.provenance_index {
                    output[position].clone_from(&source.name);
                }
                rows.push(output);
            }
        }

        let report = MergeReport::for_append(rows.len(), width, sources.len());
        tracing::info!(
            strategy = "append",
            sources = sources.len(),
            rows = report.total_rows,
            columns = report.column_count,
            "Merge complete"
        );

        MergedResult {
            header: schema.header,
            rows,
            report,
        }
    }
}

/// Unified position of every source column.
fn column_map(header: &UnifiedHeader, source_headers: &[String]) -> Vec<Option<usize>> {
    source_headers
        .iter()
        .map(|name| header.position(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Table;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn source(name: &str, headers: &[&str], rows: &[&[&str]]) -> Source {
        Source::new(
            name,
            Table::new(strings(headers), rows.iter().map(|r| strings(r)).collect()),
        )
    }

    #[test]
    fn test_append_pads_missing_columns() {
        let sources = vec![
            source("a.csv", &["Name", "Age"], &[&["Ann", "31"], &["Ben", "40"]]),
            source("b.csv", &["name", "City"], &[&["Cy", "Oslo"]]),
        ];
        let result = AppendMerger::default().merge(&sources);

        assert_eq!(result.header.names(), &["Name", "Age", "City", "Source File"]);
        assert_eq!(result.rows[0], strings(&["Ann", "31", "", "a.csv"]));
        assert_eq!(result.rows[1], strings(&["Ben", "40", "", "a.csv"]));
        assert_eq!(result.rows[2], strings(&["Cy", "", "Oslo", "b.csv"]));
        assert_eq!(result.report.total_rows, 3);
        assert_eq!(result.report.source_count, 2);
        assert_eq!(result.report.fully_matched_rows, 3);
    }

    #[test]
    fn test_append_keeps_duplicate_rows() {
        let sources = vec![
            source("a.csv", &["id"], &[&["1"]]),
            source("b.csv", &["id"], &[&["1"]]),
        ];
        let result = AppendMerger::new(ProvenanceConfig::disabled()).merge(&sources);

        assert_eq!(result.rows, vec![strings(&["1"]), strings(&["1"])]);
    }

    #[test]
    fn test_append_single_source_matches_table() {
        let sources = vec![source("only.csv", &["x", "y"], &[&["1", "2"], &["3", "4"]])];
        let result = AppendMerger::new(ProvenanceConfig::disabled()).merge(&sources);

        assert_eq!(result.header.names(), sources[0].table.headers.as_slice());
        assert_eq!(result.rows, sources[0].table.rows);
    }

    #[test]
    fn test_append_empty_sources() {
        let result = AppendMerger::default().merge(&[]);

        assert!(result.rows.is_empty());
        assert_eq!(result.report.total_rows, 0);
        assert_eq!(result.report.source_count, 0);
        assert_eq!(result.header.names(), &["Source File"]);
    }

    #[test]
    fn test_duplicate_header_within_source_last_column_wins() {
        let sources = vec![source("a.csv", &["v", "V"], &[&["first", "second"]])];
        let result = AppendMerger::new(ProvenanceConfig::disabled()).merge(&sources);

        assert_eq!(result.header.names(), &["v"]);
        assert_eq!(result.rows[0], strings(&["second"]));
    }

    #[test]
    fn test_sources_are_not_mutated() {
        let sources = vec![source("a.csv", &["id"], &[&["1"]])];
        let before = sources.clone();
        let _ = AppendMerger::default().merge(&sources);
        assert_eq!(sources, before);
    }
}
