//! Join strategy: combine the columns of every source per key.

use indexmap::{IndexMap, IndexSet};

use super::mapping::ColumnMapping;
use super::report::{MergeReport, MergeStrategy, MergedResult};
use super::spec::{JoinSpec, JoinType};
use crate::error::{MergeError, Result};
use crate::input::Source;
use crate::schema::{UnifiedHeader, union_headers};

/// Key value to row lookup for one source.
///
/// Keys are compared exactly. Rows with an empty key cell are skipped, and
/// when a key repeats the last row wins while the key keeps its
/// first-seen position.
#[derive(Debug, Clone)]
pub struct JoinIndex {
    key_position: usize,
    rows: IndexMap<String, usize>,
    duplicate_keys: usize,
    blank_keys: usize,
}

impl JoinIndex {
    /// Index `source` on the column matching `key_column`.
    pub fn build(source: &Source, key_column: &str) -> Result<Self> {
        let table = &source.table;
        let key_position =
            table
                .find_column(key_column)
                .ok_or_else(|| MergeError::KeyColumnNotFound {
                    source_name: source.name.clone(),
                    requested_key: key_column.to_string(),
                    available_columns: table.headers.clone(),
                })?;

        let mut rows = IndexMap::with_capacity(table.row_count());
        let mut duplicate_keys = 0;
        let mut blank_keys = 0;

        for (row_index, row) in table.rows.iter().enumerate() {
            let key = row.get(key_position).map_or("", String::as_str);
            if key.is_empty() {
                blank_keys += 1;
                continue;
            }
            if rows.insert(key.to_string(), row_index).is_some() {
                duplicate_keys += 1;
            }
        }

        if duplicate_keys > 0 {
            tracing::warn!(
                source = %source.name,
                duplicates = duplicate_keys,
                "Duplicate join keys; keeping the last row for each"
            );
        }
        if blank_keys > 0 {
            tracing::warn!(
                source = %source.name,
                skipped = blank_keys,
                "Rows with an empty join key were skipped"
            );
        }

        Ok(Self {
            key_position,
            rows,
            duplicate_keys,
            blank_keys,
        })
    }

    /// Column position of the key in the source.
    pub fn key_position(&self) -> usize {
        self.key_position
    }

    /// Row index for a key.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    /// True if the key is indexed.
    pub fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no key was indexed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows overwritten by a later row with the same key.
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }

    /// Rows skipped for an empty key cell.
    pub fn blank_keys(&self) -> usize {
        self.blank_keys
    }
}

/// Joins sources on a key column according to a [`JoinSpec`].
#[derive(Debug, Clone)]
pub struct JoinMerger {
    spec: JoinSpec,
}

impl JoinMerger {
    /// Create a merger for a spec.
    pub fn new(spec: JoinSpec) -> Self {
        Self { spec }
    }

    /// The spec this merger applies.
    pub fn spec(&self) -> &JoinSpec {
        &self.spec
    }

    /// Join `sources`.
    pub fn merge(&self, sources: &[Source]) -> Result<MergedResult> {
        if sources.is_empty() {
            return Err(MergeError::NoSources);
        }

        let indices = sources
            .iter()
            .map(|source| JoinIndex::build(source, &self.spec.key_column))
            .collect::<Result<Vec<_>>>()?;

        let mapping = self.spec.mapping();
        let header = join_header(sources, mapping);
        let width = header.len();

        let targets: Vec<Vec<Option<usize>>> = sources
            .iter()
            .enumerate()
            .map(|(source_index, source)| column_targets(&header, source_index, source, mapping))
            .collect();

        let keys = key_universe(&indices, self.spec.join_type);

        let mut rows = Vec::with_capacity(keys.len());
        let mut fully_matched_rows = 0;
        for key in &keys {
            let mut output = vec![String::new(); width];
            let mut present = 0;

            for ((source, index), source_targets) in sources.iter().zip(&indices).zip(&targets) {
                let Some(row_index) = index.get(key) else {
                    continue;
                };
                present += 1;
                let row = &source.table.rows[row_index];
                for (cell, target) in row.iter().zip(source_targets) {
                    if let Some(position) = *target {
                        output[position].clone_from(cell);
                    }
                }
            }

            if present == sources.len() {
                fully_matched_rows += 1;
            }
            rows.push(output);
        }

        let report = MergeReport {
            strategy: MergeStrategy::Join {
                join_type: self.spec.join_type,
            },
            total_rows: rows.len(),
            column_count: width,
            fully_matched_rows,
            partially_matched_rows: rows.len() - fully_matched_rows,
            source_count: sources.len(),
            duplicate_keys: indices.iter().map(JoinIndex::duplicate_keys).sum(),
            blank_keys: indices.iter().map(JoinIndex::blank_keys).sum(),
        };

        tracing::info!(
            strategy = "join",
            join_type = %self.spec.join_type,
            key = %self.spec.key_column,
            sources = sources.len(),
            rows = report.total_rows,
            fully_matched = report.fully_matched_rows,
            partially_matched = report.partially_matched_rows,
            "Merge complete"
        );

        Ok(MergedResult {
            header,
            rows,
            report,
        })
    }
}

/// Output header: the mapping targets when a mapping is given, otherwise
/// the union of all source headers.
fn join_header(sources: &[Source], mapping: Option<&ColumnMapping>) -> UnifiedHeader {
    match mapping {
        Some(mapping) => UnifiedHeader::from_names(mapping.targets()),
        None => union_headers(sources),
    }
}

/// Output position for each column of one source. Columns whose resolved
/// name is not in the header are dropped.
fn column_targets(
    header: &UnifiedHeader,
    source_index: usize,
    source: &Source,
    mapping: Option<&ColumnMapping>,
) -> Vec<Option<usize>> {
    source
        .table
        .headers
        .iter()
        .map(|name| {
            let output = match mapping {
                Some(mapping) => mapping.resolve(source_index, name),
                None => name.as_str(),
            };
            header.position(output)
        })
        .collect()
}

/// Keys to emit, in output order.
fn key_universe(indices: &[JoinIndex], join_type: JoinType) -> Vec<&str> {
    let (Some(first), Some(last)) = (indices.first(), indices.last()) else {
        return Vec::new();
    };

    match join_type {
        JoinType::Left => first.keys().collect(),
        JoinType::Right => last.keys().collect(),
        JoinType::Inner => first
            .keys()
            .filter(|key| indices[1..].iter().all(|index| index.contains(key)))
            .collect(),
        JoinType::Outer => {
            let mut union: IndexSet<&str> = IndexSet::new();
            for index in indices {
                union.extend(index.keys());
            }
            union.into_iter().collect()
        }
    }
}
