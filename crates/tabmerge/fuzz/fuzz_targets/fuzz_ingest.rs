//! Fuzz target for delimited ingestion.
//!
//! Ingestion must never panic, and every table it returns must have rows
//! exactly as wide as its header.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabmerge::{Parser, RawSource};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    if let Ok(source) = parser.ingest(&RawSource::delimited("fuzz.csv", data)) {
        let width = source.table.column_count();
        assert!(source.table.rows.iter().all(|row| row.len() == width));
    }
});
