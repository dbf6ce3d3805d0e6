//! Dataset error types
//!
//! Error codes:
//! - SALES_SOURCE_UNREADABLE (request fails, no partial result)
//! - SALES_INVALID_PREDICATE_SYNTAX (request fails before any chunk is read)
//! - SALES_CHUNK_EVALUATION_ERROR (absorbed per chunk; fatal only when every chunk fails)
//! - SALES_INVALID_DATASET_CONFIG (handle construction)

use serde::Serialize;
use thiserror::Error;

use crate::predicate::PredicateError;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Dataset errors
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    /// The backing file cannot be opened or its header cannot be parsed
    #[error("Source unreadable ({path}): {reason}")]
    SourceUnreadable { path: String, reason: String },

    /// The predicate text cannot be parsed into an evaluable expression
    #[error("Invalid predicate syntax: {0}")]
    InvalidPredicate(#[from] PredicateError),

    /// Every chunk of the scan failed; carries the first failure
    #[error("No chunk could be evaluated: {0}")]
    ChunkEvaluation(ChunkFailure),

    /// Dataset handle parameters are out of range
    #[error("Invalid dataset configuration: {0}")]
    InvalidConfig(String),
}

impl DatasetError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DatasetError::SourceUnreadable { .. } => "SALES_SOURCE_UNREADABLE",
            DatasetError::InvalidPredicate(_) => "SALES_INVALID_PREDICATE_SYNTAX",
            DatasetError::ChunkEvaluation(_) => "SALES_CHUNK_EVALUATION_ERROR",
            DatasetError::InvalidConfig(_) => "SALES_INVALID_DATASET_CONFIG",
        }
    }

    /// True when the dataset itself is broken rather than the request
    pub fn is_source_error(&self) -> bool {
        matches!(self, DatasetError::SourceUnreadable { .. })
    }
}

/// Why a chunk contributed no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkFailureKind {
    /// A record in the chunk could not be parsed
    Read,
    /// The predicate could not be bound against the chunk's column types
    Evaluation,
}

/// A chunk that was skipped during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    /// Zero-based chunk number in file order
    pub chunk: usize,
    /// File position of the chunk's first data row
    pub first_row: u64,
    pub kind: ChunkFailureKind,
    pub reason: String,
}

impl ChunkFailure {
    pub fn read(chunk: usize, first_row: u64, reason: impl Into<String>) -> Self {
        Self {
            chunk,
            first_row,
            kind: ChunkFailureKind::Read,
            reason: reason.into(),
        }
    }

    pub fn evaluation(chunk: usize, first_row: u64, reason: impl Into<String>) -> Self {
        Self {
            chunk,
            first_row,
            kind: ChunkFailureKind::Evaluation,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chunk {} (rows from {}): {}",
            self.chunk, self.first_row, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DatasetError::SourceUnreadable {
            path: "missing.csv".into(),
            reason: "not found".into(),
        };
        assert_eq!(err.code(), "SALES_SOURCE_UNREADABLE");
        assert!(err.is_source_error());

        let err = DatasetError::ChunkEvaluation(ChunkFailure::evaluation(0, 0, "bad"));
        assert_eq!(err.code(), "SALES_CHUNK_EVALUATION_ERROR");
        assert!(!err.is_source_error());
    }

    #[test]
    fn test_chunk_failure_display() {
        let failure = ChunkFailure::read(2, 20_000, "found record with 4 fields");
        let display = failure.to_string();
        assert!(display.contains("chunk 2"));
        assert!(display.contains("20000"));
    }

    #[test]
    fn test_chunk_failure_serialization() {
        let failure = ChunkFailure::evaluation(1, 10, "column 'x' is not defined");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "evaluation");
        assert_eq!(json["first_row"], 10);
    }
}
