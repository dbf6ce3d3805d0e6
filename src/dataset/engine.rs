//! Chunked Query Engine
//!
//! Streams the dataset chunk by chunk, binds the predicate against each
//! chunk's inferred column types, and appends matching rows in file order.
//!
//! # Outcome policy
//!
//! - A chunk that fails to read or bind contributes no rows and is recorded
//!   in `QueryOutput::skipped`; the scan continues.
//! - If at least one chunk was scanned and none could be evaluated, the query
//!   fails with `DatasetError::ChunkEvaluation`.
//! - Zero matches is a successful, empty result.
//! - Cancellation is observed before each chunk read; the rows gathered so
//!   far are returned with `ScanStatus::Cancelled`.

use tracing::{debug, info, warn};

use crate::observability::Event;
use crate::predicate::Predicate;

use super::cancel::CancelFlag;
use super::chunk::{Chunk, ChunkBody, ChunkReader, TypedChunk};
use super::errors::{ChunkFailure, DatasetError, DatasetResult};
use super::handle::DatasetHandle;
use super::row::{Row, RowSet};
use super::schema::{self, Schema};

/// How a scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every chunk was visited
    Complete,
    /// Cancellation was requested before the file was exhausted
    Cancelled,
}

/// Outcome of one query
#[derive(Debug, Clone)]
pub struct QueryOutput {
    /// Predicate text as supplied (or the match-all text)
    pub predicate: String,
    pub rows: RowSet,
    pub status: ScanStatus,
    /// Chunks read, including skipped ones
    pub chunks_scanned: usize,
    pub skipped: Vec<ChunkFailure>,
}

impl QueryOutput {
    pub fn is_cancelled(&self) -> bool {
        self.status == ScanStatus::Cancelled
    }
}

/// Query engine over one dataset handle
#[derive(Debug, Clone)]
pub struct QueryEngine {
    handle: DatasetHandle,
}

impl QueryEngine {
    pub fn new(handle: DatasetHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    /// Read the dataset's column names
    pub fn discover_columns(&self) -> DatasetResult<Schema> {
        schema::discover_columns(&self.handle)
    }

    /// Parse the predicate text and run the query
    ///
    /// Absent or blank text matches every row. Syntax errors are reported
    /// before the file is opened.
    pub fn query_text(&self, text: Option<&str>, cancel: &CancelFlag) -> DatasetResult<QueryOutput> {
        let predicate = match text {
            Some(text) if !text.trim().is_empty() => Predicate::parse(text)?,
            _ => Predicate::match_all(),
        };
        self.query(&predicate, cancel)
    }

    /// Run a parsed predicate over every chunk of the dataset
    pub fn query(&self, predicate: &Predicate, cancel: &CancelFlag) -> DatasetResult<QueryOutput> {
        let schema = self.discover_columns()?;

        info!(
            event = Event::QueryStart.as_str(),
            predicate = predicate.text(),
            chunk_size = self.handle.chunk_size(),
            "query started"
        );

        let chunks = ChunkReader::open(&self.handle, schema.len())?;
        scan(schema, predicate, chunks, cancel)
    }
}

/// Evaluate chunks in order, checking for cancellation before each one
fn scan(
    schema: Schema,
    predicate: &Predicate,
    mut chunks: impl Iterator<Item = DatasetResult<Chunk>>,
    cancel: &CancelFlag,
) -> DatasetResult<QueryOutput> {
    let mut rows = RowSet::empty(schema.clone());
    let mut skipped = Vec::new();
    let mut evaluated = 0usize;
    let mut chunks_scanned = 0usize;
    let mut status = ScanStatus::Complete;

    loop {
        if cancel.is_cancelled() {
            status = ScanStatus::Cancelled;
            break;
        }
        let chunk = match chunks.next() {
            Some(chunk) => chunk?,
            None => break,
        };
        chunks_scanned += 1;

        match evaluate_chunk(&schema, predicate, chunk) {
            Ok(matched) => {
                evaluated += 1;
                rows.extend(matched);
            }
            Err(failure) => {
                warn!(
                    event = Event::ChunkSkipped.as_str(),
                    chunk = failure.chunk,
                    first_row = failure.first_row,
                    reason = %failure.reason,
                    "chunk skipped"
                );
                skipped.push(failure);
            }
        }
    }

    if status == ScanStatus::Complete && evaluated == 0 && !skipped.is_empty() {
        return Err(DatasetError::ChunkEvaluation(skipped.swap_remove(0)));
    }

    match status {
        ScanStatus::Cancelled => warn!(
            event = Event::QueryCancelled.as_str(),
            predicate = predicate.text(),
            chunks_scanned,
            rows = rows.len(),
            "query cancelled"
        ),
        ScanStatus::Complete if rows.is_empty() => info!(
            event = Event::NoMatch.as_str(),
            predicate = predicate.text(),
            "no rows matched"
        ),
        ScanStatus::Complete => info!(
            event = Event::QueryComplete.as_str(),
            predicate = predicate.text(),
            chunks_scanned,
            chunks_skipped = skipped.len(),
            rows = rows.len(),
            "query complete"
        ),
    }

    Ok(QueryOutput {
        predicate: predicate.text().to_string(),
        rows,
        status,
        chunks_scanned,
        skipped,
    })
}

/// Matching rows of one chunk, or why the chunk was skipped
fn evaluate_chunk(schema: &Schema, predicate: &Predicate, chunk: Chunk) -> Result<Vec<Row>, ChunkFailure> {
    let records = match chunk.body {
        ChunkBody::Records(records) => records,
        ChunkBody::Malformed { reason } => {
            return Err(ChunkFailure::read(chunk.index, chunk.first_row, reason));
        }
    };

    let typed = TypedChunk::new(schema.len(), chunk.first_row, &records);
    let bound = predicate
        .bind(schema, typed.types())
        .map_err(|e| ChunkFailure::evaluation(chunk.index, chunk.first_row, e.to_string()))?;

    debug!(chunk = chunk.index, rows = records.len(), "chunk evaluated");

    Ok(typed
        .into_rows()
        .into_iter()
        .filter(|row| bound.matches(row))
        .collect())
}
