//! Header reconciliation for the append strategy.

use serde::{Deserialize, Serialize};

use super::header::UnifiedHeader;
use crate::input::Source;

/// Default name of the provenance column.
pub const DEFAULT_PROVENANCE_COLUMN: &str = "Source File";

/// Whether and how to tag stacked rows with their origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceConfig {
    /// Append the provenance column.
    pub enabled: bool,
    /// Preferred column name. Suffixed if a real column already uses it.
    pub column_name: String,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            column_name: DEFAULT_PROVENANCE_COLUMN.to_string(),
        }
    }
}

impl ProvenanceConfig {
    /// No provenance column.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Provenance under a custom column name.
    pub fn named(column_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            column_name: column_name.into(),
        }
    }
}

/// Output of [`SchemaUnifier::unify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedSchema {
    /// Deduplicated header, provenance column last when enabled.
    pub header: UnifiedHeader,
    /// Position of the provenance column.
    pub provenance_index: Option<usize>,
}

/// Computes one header from many source headers.
#[derive(Debug, Clone, Default)]
pub struct SchemaUnifier {
    provenance: ProvenanceConfig,
}

impl SchemaUnifier {
    /// Create a unifier with the given provenance settings.
    pub fn new(provenance: ProvenanceConfig) -> Self {
        Self { provenance }
    }

    /// Union the source headers in source order, first spelling wins, then
    /// append the provenance column if enabled.
    pub fn unify(&self, sources: &[Source]) -> UnifiedSchema {
        let mut header = union_headers(sources);

        let provenance_index = self
            .provenance
            .enabled
            .then(|| header.insert_distinct(&self.provenance.column_name));

        tracing::debug!(
            sources = sources.len(),
            columns = header.len(),
            provenance = provenance_index.is_some(),
            "Unified append header"
        );

        UnifiedSchema {
            header,
            provenance_index,
        }
    }
}

/// Ordered, case-insensitive union of every source header.
pub fn union_headers(sources: &[Source]) -> UnifiedHeader {
    UnifiedHeader::from_names(
        sources
            .iter()
            .flat_map(|source| source.table.headers.iter().map(String::as_str)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Table;

    fn source(name: &str, headers: &[&str]) -> Source {
        Source::new(
            name,
            Table::new(headers.iter().map(|h| h.to_string()).collect(), vec![]),
        )
    }

    #[test]
    fn test_unify_case_insensitive() {
        let sources = vec![
            source("a.csv", &["Name", "Age"]),
            source("b.csv", &["name", "City"]),
        ];
        let schema = SchemaUnifier::default().unify(&sources);

        assert_eq!(
            schema.header.names(),
            &["Name", "Age", "City", "Source File"]
        );
        assert_eq!(schema.provenance_index, Some(3));
    }

    #[test]
    fn test_unify_without_provenance() {
        let sources = vec![source("a.csv", &["x"]), source("b.csv", &[" X ", "y"])];
        let schema = SchemaUnifier::new(ProvenanceConfig::disabled()).unify(&sources);

        assert_eq!(schema.header.names(), &["x", "y"]);
        assert_eq!(schema.provenance_index, None);
    }

    #[test]
    fn test_zero_column_source_contributes_nothing() {
        let sources = vec![source("empty.csv", &[]), source("b.csv", &["id"])];
        let schema = SchemaUnifier::new(ProvenanceConfig::disabled()).unify(&sources);
        assert_eq!(schema.header.names(), &["id"]);
    }

    #[test]
    fn test_provenance_name_collision() {
        let sources = vec![source("a.csv", &["id", "source file"])];
        let schema = SchemaUnifier::default().unify(&sources);

        assert_eq!(
            schema.header.names(),
            &["id", "source file", "Source File (2)"]
        );
        assert_eq!(schema.provenance_index, Some(2));
    }

    #[test]
    fn test_custom_provenance_name() {
        let sources = vec![source("a.csv", &["id"])];
        let schema = SchemaUnifier::new(ProvenanceConfig::named("origin")).unify(&sources);
        assert_eq!(schema.header.names(), &["id", "origin"]);
    }
}
