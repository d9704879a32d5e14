//! Column identity and header unification.

mod header;
mod unifier;

pub use header::{ColumnKey, UnifiedHeader};
pub use unifier::{
    DEFAULT_PROVENANCE_COLUMN, ProvenanceConfig, SchemaUnifier, UnifiedSchema, union_headers,
};
