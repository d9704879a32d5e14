//! Integration tests for tabmerge.

use std::io::Write;
use tempfile::NamedTempFile;

use tabmerge::{
    ColumnMapping, Exporter, JoinSpec, JoinType, MergeError, Merger, OutputFormat, RawSource,
    Source, Table, merge_append, merge_join,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn source(name: &str, content: &str) -> Source {
    tabmerge::Parser::new()
        .ingest(&RawSource::delimited(name, content))
        .expect("Ingestion failed")
}

fn keyed(name: &str, keys: &[&str]) -> Source {
    let mut content = format!("id,{name}\n");
    for key in keys {
        content.push_str(&format!("{key},{name}-{key}\n"));
    }
    source(name, &content)
}

fn keys_of(result: &tabmerge::MergedResult) -> Vec<&str> {
    result.column_by_name("id").expect("id column")
}

// =============================================================================
// Append Strategy Tests
// =============================================================================

#[test]
fn test_append_header_case_insensitive_merge() {
    let sources = vec![
        source("people.csv", "Name,Age\nAnn,31\n"),
        source("more.csv", "name,City\nBen,Oslo\n"),
    ];
    let result = merge_append(&sources, true);

    assert_eq!(result.header.names(), &["Name", "Age", "City", "Source File"]);
    assert_eq!(result.rows[1], vec!["Ben", "", "Oslo", "more.csv"]);
}

#[test]
fn test_append_row_count_is_sum_of_sources() {
    let sources = vec![
        source("a.csv", "x\n1\n2\n3\n"),
        source("b.csv", "y\n4\n"),
        source("c.csv", "x,y\n"),
    ];
    let result = merge_append(&sources, true);

    assert_eq!(result.report.total_rows, 4);
    assert_eq!(result.row_count(), 4);
    assert_eq!(result.report.source_count, 3);
}

#[test]
fn test_append_files_mixed_delimiters() {
    let csv = create_test_file("sku,qty\nA1,3\nB2,5\n", ".csv");
    let tsv = create_test_file("SKU\tprice\nC3\t9.99\n", ".tsv");

    let result = Merger::new()
        .append_files(&[csv.path(), tsv.path()])
        .expect("Merge failed");

    assert_eq!(result.header.names(), &["sku", "qty", "price", "Source File"]);
    assert_eq!(result.column_by_name("sku").unwrap(), vec!["A1", "B2", "C3"]);
    assert_eq!(result.column_by_name("price").unwrap(), vec!["", "", "9.99"]);
}

// =============================================================================
// Join Strategy Tests
// =============================================================================

#[test]
fn test_inner_join_yields_shared_keys() {
    let sources = vec![keyed("a", &["1", "2", "3"]), keyed("b", &["2", "3", "4"])];
    let result = merge_join(&sources, &JoinSpec::new("id", JoinType::Inner)).unwrap();

    assert_eq!(keys_of(&result), vec!["2", "3"]);
    assert_eq!(result.report.fully_matched_rows, 2);
    assert_eq!(result.report.partially_matched_rows, 0);
}

#[test]
fn test_left_join_match_counts() {
    let sources = vec![keyed("left", &["a", "b"]), keyed("right", &["b", "c"])];
    let result = merge_join(&sources, &JoinSpec::new("id", JoinType::Left)).unwrap();

    assert_eq!(keys_of(&result), vec!["a", "b"]);
    assert_eq!(result.report.fully_matched_rows, 1);
    assert_eq!(result.report.partially_matched_rows, 1);
    assert_eq!(result.rows[0], vec!["a", "left-a", ""]);
}

#[test]
fn test_outer_join_yields_union() {
    let sources = vec![keyed("left", &["a", "b"]), keyed("right", &["b", "c"])];
    let result = merge_join(&sources, &JoinSpec::new("id", JoinType::Outer)).unwrap();

    assert_eq!(keys_of(&result), vec!["a", "b", "c"]);
}

#[test]
fn test_right_join_yields_last_source_keys() {
    let sources = vec![keyed("left", &["a", "b"]), keyed("right", &["b", "c"])];
    let result = merge_join(&sources, &JoinSpec::new("id", JoinType::Right)).unwrap();

    assert_eq!(keys_of(&result), vec!["b", "c"]);
    assert_eq!(result.rows[1], vec!["c", "", "right-c"]);
}

#[test]
fn test_join_key_matched_case_insensitively() {
    let sources = vec![
        source("a.csv", " Customer ID ,plan\n7,pro\n"),
        source("b.csv", "customer id,seats\n7,12\n"),
    ];
    let result = merge_join(&sources, &JoinSpec::new("CUSTOMER ID", JoinType::Inner)).unwrap();

    assert_eq!(result.header.names(), &[" Customer ID ", "plan", "seats"]);
    assert_eq!(result.rows, vec![vec!["7", "pro", "12"]]);
}

#[test]
fn test_key_column_not_found_names_source_and_columns() {
    let sources = vec![
        source("customers.csv", "id,name\n1,Ann\n"),
        source("orders.csv", "order_no,customer\n9,1\n"),
    ];
    let err = merge_join(&sources, &JoinSpec::new("id", JoinType::Left)).unwrap_err();

    match err {
        MergeError::KeyColumnNotFound {
            ref source_name,
            ref requested_key,
            ref available_columns,
        } => {
            assert_eq!(source_name, "orders.csv");
            assert_eq!(requested_key, "id");
            assert_eq!(available_columns, &vec!["order_no", "customer"]);
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("order_no, customer"));
}

#[test]
fn test_key_column_missing_everywhere_reports_first_source() {
    let sources = vec![source("a.csv", "x\n1\n"), source("b.csv", "y\n2\n")];
    let err = merge_join(&sources, &JoinSpec::new("id", JoinType::Outer)).unwrap_err();

    assert!(matches!(
        err,
        MergeError::KeyColumnNotFound { ref source_name, .. } if source_name == "a.csv"
    ));
}

#[test]
fn test_join_with_mapping_from_json_spec() {
    let spec_file = create_test_file(
        r#"{
            "key_column": "id",
            "join_type": "outer",
            "column_mapping": [
                {"source": 0, "column": "id", "output": "Account"},
                {"source": 0, "column": "owner", "output": "Owner"},
                {"source": 1, "column": "id", "output": "Account"},
                {"source": 1, "column": "holder", "output": "Owner"},
                {"source": 1, "column": "balance", "output": "Balance"}
            ]
        }"#,
        ".json",
    );
    let spec = JoinSpec::load(spec_file.path()).expect("Spec should load");

    let sources = vec![
        source("crm.csv", "id,owner\nA,Ann\nB,Ben\n"),
        source("ledger.csv", "id,holder,balance\nB,Benjamin,10\nC,Cy,5\n"),
    ];
    let result = merge_join(&sources, &spec).unwrap();

    assert_eq!(result.header.names(), &["Account", "Owner", "Balance"]);
    assert_eq!(
        result.rows,
        vec![
            vec!["A", "Ann", ""],
            vec!["B", "Benjamin", "10"],
            vec!["C", "Cy", "5"],
        ]
    );
}

#[test]
fn test_join_deserialized_source_with_short_row() {
    let ragged: Source = serde_json::from_str(
        r#"{"name":"ragged.json","table":{"headers":["v","id"],"rows":[["x"],["y","2"]]}}"#,
    )
    .unwrap();
    let other = keyed("other", &["2"]);

    let result = merge_join(&[ragged, other], &JoinSpec::new("id", JoinType::Left)).unwrap();

    assert_eq!(result.header.names(), &["v", "id", "other"]);
    assert_eq!(result.rows, vec![vec!["y", "2", "other-2"]]);
    assert_eq!(result.report.blank_keys, 1);
}

#[test]
fn test_join_no_sources() {
    let err = merge_join(&[], &JoinSpec::new("id", JoinType::Inner)).unwrap_err();
    assert!(matches!(err, MergeError::NoSources));
}

#[test]
fn test_join_three_sources_outer() {
    let sources = vec![
        keyed("a", &["1", "2"]),
        keyed("b", &["2", "3"]),
        keyed("c", &["3", "1", "4"]),
    ];
    let result = merge_join(&sources, &JoinSpec::new("id", JoinType::Outer)).unwrap();

    assert_eq!(keys_of(&result), vec!["1", "2", "3", "4"]);
    assert_eq!(result.report.fully_matched_rows, 0);
    assert_eq!(result.report.partially_matched_rows, 4);
    assert_eq!(result.rows[3], vec!["4", "", "", "c-4"]);
}

#[test]
fn test_mapping_builder_on_files() {
    let a = create_test_file("sku,name\nX,Widget\n", ".csv");
    let b = create_test_file("sku,stock\nX,4\n", ".csv");
    let mapping = ColumnMapping::new()
        .with(0, "sku", "SKU")
        .with(0, "name", "Product")
        .with(1, "sku", "SKU")
        .with(1, "stock", "On Hand");
    let spec = JoinSpec::new("sku", JoinType::Inner).with_mapping(mapping);

    let result = Merger::new()
        .join_files(&[a.path(), b.path()], &spec)
        .unwrap();

    assert_eq!(result.header.names(), &["SKU", "Product", "On Hand"]);
    assert_eq!(result.rows, vec![vec!["X", "Widget", "4"]]);
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_round_trips_through_ingestion() {
    let sources = vec![
        source("a.csv", "id,note\n1,\"hello, world\"\n"),
        source("b.csv", "id,note\n2,plain\n"),
    ];
    let result = merge_append(&sources, false);

    let csv = Exporter::new(OutputFormat::Csv).render(&result).unwrap();
    let reparsed = source("merged.csv", &csv);

    assert_eq!(
        reparsed.table,
        Table::new(
            vec!["id".to_string(), "note".to_string()],
            vec![
                vec!["1".to_string(), "hello, world".to_string()],
                vec!["2".to_string(), "plain".to_string()],
            ],
        )
    );
}

#[test]
fn test_export_save_json() {
    let sources = vec![source("a.csv", "id,v\n1,x\n")];
    let result = merge_append(&sources, true);

    let out = NamedTempFile::with_suffix(".json").unwrap();
    Exporter::new(OutputFormat::Json)
        .save(&result, out.path())
        .unwrap();

    let written = std::fs::read_to_string(out.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value[0]["Source File"], "a.csv");
}
