//! Query Engine Tests
//!
//! End-to-end behaviour of discovery and chunked queries on real files:
//! - Column discovery reads the header only
//! - Results are in file order and independent of chunk size
//! - A failing chunk contributes nothing and does not stop the scan
//! - Source failures are fatal for the request

use salesdb::dataset::{CancelFlag, DatasetHandle, QueryEngine, Value};
use std::fmt::Write as _;
use std::io::Write;
use tempfile::NamedTempFile;

// =============================================================================
// Test Utilities
// =============================================================================

fn write_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn engine(file: &NamedTempFile, chunk_size: usize) -> QueryEngine {
    QueryEngine::new(DatasetHandle::new(file.path(), ';', chunk_size).unwrap())
}

fn sales_rows(count: usize) -> String {
    let regions = ["north", "south", "east", "west"];
    let mut text = String::from("order_id;region;price;paid\n");
    for i in 0..count {
        writeln!(
            text,
            "{};{};{};{}",
            i,
            regions[i % regions.len()],
            (i * 7) % 300,
            if i % 3 == 0 { "True" } else { "False" }
        )
        .unwrap();
    }
    text
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_columns_in_file_order() {
    let file = write_dataset("order_id;region;price\n1;north;10\n");
    let schema = engine(&file, 10).discover_columns().unwrap();
    assert_eq!(schema.columns(), ["order_id", "region", "price"]);
}

#[test]
fn test_discovery_ignores_bad_data_rows() {
    let file = write_dataset("a;b\n1;2;3;4\n\u{0}garbage\n");
    let schema = engine(&file, 10).discover_columns().unwrap();
    assert_eq!(schema.columns(), ["a", "b"]);
}

#[test]
fn test_discovery_missing_file() {
    let handle = DatasetHandle::new("/definitely/not/here.csv", ';', 10).unwrap();
    let err = QueryEngine::new(handle).discover_columns().unwrap_err();
    assert_eq!(err.code(), "SALES_SOURCE_UNREADABLE");
}

// =============================================================================
// Chunk-size independence
// =============================================================================

#[test]
fn test_result_independent_of_chunk_size() {
    let file = write_dataset(&sales_rows(25_000));
    let predicate = Some("price < 100 and region in ['north', 'east']");

    let large = engine(&file, 10_000)
        .query_text(predicate, &CancelFlag::new())
        .unwrap();
    let small = engine(&file, 5_000)
        .query_text(predicate, &CancelFlag::new())
        .unwrap();

    assert_eq!(large.chunks_scanned, 3);
    assert_eq!(small.chunks_scanned, 5);
    assert!(!large.rows.is_empty());
    assert_eq!(large.rows.rows(), small.rows.rows());
}

#[test]
fn test_full_scan_returns_every_row_in_order() {
    let file = write_dataset(&sales_rows(1_234));
    let output = engine(&file, 100).query_text(None, &CancelFlag::new()).unwrap();

    assert_eq!(output.rows.len(), 1_234);
    let ids = output.rows.column("order_id").unwrap();
    assert!(ids
        .iter()
        .enumerate()
        .all(|(i, id)| **id == Value::Int(i as i64)));
}

#[test]
fn test_query_is_repeatable() {
    let file = write_dataset(&sales_rows(500));
    let engine = engine(&file, 64);
    let first = engine.query_text(Some("paid"), &CancelFlag::new()).unwrap();
    let second = engine.query_text(Some("paid"), &CancelFlag::new()).unwrap();
    assert_eq!(first.rows, second.rows);
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_price_filter_keeps_file_order() {
    let file = write_dataset("price\n50\n150\n99\n");
    let output = engine(&file, 2)
        .query_text(Some("price < 100"), &CancelFlag::new())
        .unwrap();
    assert_eq!(
        output.rows.column("price").unwrap(),
        vec![&Value::Int(50), &Value::Int(99)]
    );
}

#[test]
fn test_no_match_is_empty() {
    let file = write_dataset(&sales_rows(50));
    let output = engine(&file, 10)
        .query_text(Some("price > 10000"), &CancelFlag::new())
        .unwrap();
    assert!(output.rows.is_empty());
    assert!(output.skipped.is_empty());
}

#[test]
fn test_na_tokens_never_match_comparisons() {
    let file = write_dataset("price;region\n10;north\nNA;south\n;east\n30;west\n");
    let output = engine(&file, 10)
        .query_text(Some("price >= 0"), &CancelFlag::new())
        .unwrap();
    assert_eq!(
        output.rows.column("region").unwrap(),
        vec![&Value::Str("north".into()), &Value::Str("west".into())]
    );
}

// =============================================================================
// Chunk failure isolation
// =============================================================================

#[test]
fn test_type_drift_skips_only_that_chunk() {
    // second chunk holds text in a numeric column
    let file = write_dataset("price\n1\n2\nlow\nhigh\n5\n6\n");
    let output = engine(&file, 2)
        .query_text(Some("price < 100"), &CancelFlag::new())
        .unwrap();

    let positions: Vec<u64> = output.rows.rows().iter().map(|r| r.position()).collect();
    assert_eq!(positions, vec![0, 1, 4, 5]);
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].first_row, 2);
}

#[test]
fn test_wide_record_skips_only_that_chunk() {
    let file = write_dataset("a;b\n1;x\n2;y;extra\n3;z\n4;w\n");
    let output = engine(&file, 2).query_text(None, &CancelFlag::new()).unwrap();

    let positions: Vec<u64> = output.rows.rows().iter().map(|r| r.position()).collect();
    assert_eq!(positions, vec![2, 3]);
    assert_eq!(output.skipped.len(), 1);
}

#[test]
fn test_unknown_column_everywhere_fails() {
    let file = write_dataset(&sales_rows(30));
    let err = engine(&file, 10)
        .query_text(Some("discount > 0"), &CancelFlag::new())
        .unwrap_err();
    assert_eq!(err.code(), "SALES_CHUNK_EVALUATION_ERROR");
}

#[test]
fn test_header_only_file_is_empty_success() {
    let file = write_dataset("a;b\n");
    let output = engine(&file, 10)
        .query_text(Some("a > 1"), &CancelFlag::new())
        .unwrap();
    assert!(output.rows.is_empty());
    assert_eq!(output.chunks_scanned, 0);
}

// =============================================================================
// Source failures
// =============================================================================

#[test]
fn test_empty_file_is_unreadable() {
    let file = write_dataset("");
    let err = engine(&file, 10).query_text(None, &CancelFlag::new()).unwrap_err();
    assert!(err.is_source_error());
}

#[test]
fn test_syntax_checked_before_source() {
    let handle = DatasetHandle::new("/definitely/not/here.csv", ';', 10).unwrap();
    let err = QueryEngine::new(handle)
        .query_text(Some("price = 3"), &CancelFlag::new())
        .unwrap_err();
    assert_eq!(err.code(), "SALES_INVALID_PREDICATE_SYNTAX");
}
