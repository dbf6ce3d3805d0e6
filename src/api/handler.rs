//! API Handler for salesdb
//!
//! Wraps the query engine and classifies every outcome into a `QueryResult`.

use serde::Serialize;
use tracing::{error, warn};

use crate::dataset::{CancelFlag, ChunkFailure, DatasetError, QueryEngine, RowSet, Schema};
use crate::observability::Event;

use super::response::QueryResult;

/// Payload of a column discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnsPayload {
    pub columns: Schema,
}

/// Payload of a query
#[derive(Debug, Clone, Serialize)]
pub struct RowsPayload {
    pub predicate: String,
    pub row_count: usize,
    pub rows: RowSet,
    pub skipped_chunks: Vec<ChunkFailure>,
}

/// Dataset operations exposed to transports
#[derive(Debug, Clone)]
pub struct DatasetApi {
    engine: QueryEngine,
}

impl DatasetApi {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Column names in file order
    pub fn discover_columns(&self) -> QueryResult<ColumnsPayload> {
        match self.engine.discover_columns() {
            Ok(columns) => QueryResult::success("columns discovered", ColumnsPayload { columns }),
            Err(e) => failure(&e, None),
        }
    }

    /// Rows matching `predicate`, or every row when it is absent or blank
    pub fn query(&self, predicate: Option<&str>, cancel: &CancelFlag) -> QueryResult<RowsPayload> {
        let output = match self.engine.query_text(predicate, cancel) {
            Ok(output) => output,
            Err(e) => return failure(&e, predicate),
        };

        let cancelled = output.is_cancelled();
        let payload = RowsPayload {
            predicate: output.predicate,
            row_count: output.rows.len(),
            rows: output.rows,
            skipped_chunks: output.skipped,
        };

        if cancelled {
            QueryResult::cancelled(
                format!("query cancelled after {} chunk(s)", output.chunks_scanned),
                payload,
            )
        } else if payload.row_count == 0 {
            QueryResult::success(format!("no rows matched predicate: {}", payload.predicate), payload)
        } else {
            QueryResult::success("query succeeded", payload)
        }
    }
}

fn failure<T>(err: &DatasetError, predicate: Option<&str>) -> QueryResult<T> {
    if err.is_source_error() {
        error!(
            event = Event::QueryFailed.as_str(),
            code = err.code(),
            error = %err,
            "dataset unavailable"
        );
    } else {
        warn!(
            event = Event::QueryFailed.as_str(),
            code = err.code(),
            predicate = predicate.unwrap_or_default(),
            error = %err,
            "query rejected"
        );
    }
    QueryResult::from_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::dataset::DatasetHandle;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn api_for(contents: &str, chunk_size: usize) -> (NamedTempFile, DatasetApi) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let handle = DatasetHandle::new(file.path(), ';', chunk_size).unwrap();
        (file, DatasetApi::new(QueryEngine::new(handle)))
    }

    #[test]
    fn test_columns_success() {
        let (_file, api) = api_for("id;price\n1;10\n", 10);
        let result = api.discover_columns();
        assert!(result.is_success());
        assert_eq!(result.data().unwrap().columns.columns(), ["id", "price"]);
    }

    #[test]
    fn test_query_payload() {
        let (_file, api) = api_for("id;price\n1;50\n2;150\n3;99\n", 2);
        let result = api.query(Some("price < 100"), &CancelFlag::new());
        let payload = result.data().unwrap();
        assert_eq!(payload.row_count, 2);
        assert_eq!(payload.predicate, "price < 100");
        assert!(payload.skipped_chunks.is_empty());
    }

    #[test]
    fn test_no_match_is_success() {
        let (_file, api) = api_for("id;price\n1;50\n", 10);
        let result = api.query(Some("price > 1000"), &CancelFlag::new());
        assert!(result.is_success());
        assert_eq!(result.message(), "no rows matched predicate: price > 1000");
        assert_eq!(result.data().unwrap().row_count, 0);
    }

    #[test]
    fn test_syntax_error_classified() {
        let (_file, api) = api_for("id;price\n1;50\n", 10);
        let result = api.query(Some("price <"), &CancelFlag::new());
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidPredicateSyntax));
        assert_eq!(result.code(), 400);
    }

    #[test]
    fn test_deep_nesting_classified_as_syntax() {
        let (_file, api) = api_for("id;price\n1;50\n", 10);
        let text = format!("{}price > 0{}", "(".repeat(10_000), ")".repeat(10_000));
        let result = api.query(Some(&text), &CancelFlag::new());
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidPredicateSyntax));
        assert_eq!(result.code(), 400);
    }

    #[test]
    fn test_unknown_column_classified() {
        let (_file, api) = api_for("id;price\n1;50\n", 10);
        let result = api.query(Some("cost < 3"), &CancelFlag::new());
        assert_eq!(result.error_kind(), Some(ErrorKind::ChunkEvaluationError));
        assert_eq!(result.code(), 422);
    }

    #[test]
    fn test_cancelled_query() {
        let (_file, api) = api_for("id;price\n1;50\n", 10);
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = api.query(None, &cancel);
        assert_eq!(result.code(), 206);
        assert_eq!(result.data().unwrap().row_count, 0);
    }
}
