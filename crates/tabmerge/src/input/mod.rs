//! Source ingestion and the canonical table model.

mod parser;
mod source;
mod workbook;

pub use parser::{Parser, ParserConfig, RawSource, SourceFormat};
pub use source::{Source, SourceMetadata, Table};
pub use workbook::{Workbook, WorkbookReader};
