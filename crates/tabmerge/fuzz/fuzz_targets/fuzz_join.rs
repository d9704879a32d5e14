//! Fuzz target for the join strategy.
//!
//! Builds several small sources from arbitrary cells and checks that every
//! join type produces aligned rows and consistent match counts.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tabmerge::{merge_join, JoinSpec, JoinType, Source, Table};

#[derive(Debug, Arbitrary)]
struct Input {
    key: String,
    join_type: u8,
    sources: Vec<(Vec<String>, Vec<Vec<String>>)>,
}

fuzz_target!(|input: Input| {
    if input.sources.len() > 8 {
        return;
    }

    let sources: Vec<Source> = input
        .sources
        .into_iter()
        .enumerate()
        .map(|(i, (headers, rows))| {
            let rows = rows.into_iter().take(64).collect();
            Source::new(format!("s{i}"), Table::new(headers, rows))
        })
        .collect();

    let join_type = match input.join_type % 4 {
        0 => JoinType::Left,
        1 => JoinType::Inner,
        2 => JoinType::Right,
        _ => JoinType::Outer,
    };

    if let Ok(result) = merge_join(&sources, &JoinSpec::new(input.key, join_type)) {
        let width = result.header.len();
        assert!(result.rows.iter().all(|row| row.len() == width));
        assert_eq!(
            result.report.fully_matched_rows + result.report.partially_matched_rows,
            result.report.total_rows
        );
    }
});
