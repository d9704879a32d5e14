//! Merge strategies: append (stack rows) and join (combine per key).

mod append;
mod join;
mod mapping;
mod report;
mod spec;

pub use append::AppendMerger;
pub use join::{JoinIndex, JoinMerger};
pub use mapping::{ColumnMapping, MappingEntry};
pub use report::{MergeReport, MergeStrategy, MergedResult};
pub use spec::{JoinSpec, JoinType};
