//! tabmerge: combine heterogeneous tabular sources into one table.
//!
//! Two strategies are available:
//!
//! - **Append** stacks every source's rows under a unified header. Columns
//!   are matched by name, ignoring case and surrounding whitespace, and the
//!   first spelling seen wins. A provenance column records each row's source.
//! - **Join** combines sources on a key column with left, inner, right, or
//!   outer semantics, optionally renaming columns through a [`ColumnMapping`].
//!
//! Every cell is treated as text. Sources are never mutated, and every merge
//! returns a [`MergeReport`] with row and match counts.
//!
//! # Example
//!
//! ```no_run
//! use tabmerge::{JoinSpec, JoinType, Merger};
//!
//! let merger = Merger::new();
//! let spec = JoinSpec::new("customer_id", JoinType::Left);
//! let result = merger.join_files(&["customers.csv", "orders.csv"], &spec).unwrap();
//!
//! println!("Rows: {}", result.report.total_rows);
//! println!("Fully matched: {}", result.report.fully_matched_rows);
//! ```

pub mod error;
pub mod export;
pub mod input;
pub mod merge;
pub mod schema;

mod merger;

pub use crate::merger::{MergeConfig, Merger, merge_append, merge_join};
pub use error::{IngestFailure, MergeError, Result};
pub use export::{Exporter, OutputFormat};
pub use input::{
    Parser, ParserConfig, RawSource, Source, SourceFormat, SourceMetadata, Table, Workbook,
    WorkbookReader,
};
pub use merge::{
    AppendMerger, ColumnMapping, JoinIndex, JoinMerger, JoinSpec, JoinType, MappingEntry,
    MergeReport, MergeStrategy, MergedResult,
};
pub use schema::{ColumnKey, ProvenanceConfig, SchemaUnifier, UnifiedHeader};
