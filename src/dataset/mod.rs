//! Dataset subsystem for salesdb
//!
//! Serves rows from a single delimited file. The file is never loaded whole:
//! schema discovery reads the header record only, and queries stream the data
//! in fixed-size chunks.
//!
//! # Design Principles
//!
//! - Read-only; the file is treated as static for the process lifetime
//! - One handle per process, passed explicitly
//! - Each read opens its own cursor
//! - Result order is file order, independent of chunk size
//! - Chunk failures are local; source failures are fatal for the request

mod cancel;
mod chunk;
mod config;
mod engine;
mod errors;
mod handle;
mod row;
mod schema;
mod value;

pub use cancel::{CancelFlag, CancelGuard};
pub use chunk::{Chunk, ChunkBody, ChunkReader, TypedChunk};
pub use config::{DatasetConfig, DEFAULT_CHUNK_SIZE, DEFAULT_DATASET_PATH, DEFAULT_DELIMITER};
pub use engine::{QueryEngine, QueryOutput, ScanStatus};
pub use errors::{ChunkFailure, ChunkFailureKind, DatasetError, DatasetResult};
pub use handle::DatasetHandle;
pub use row::{Row, RowSet};
pub use schema::{discover_columns, Schema};
pub use value::{infer_column_type, is_na, parse_cell, ColumnType, Value, ValueKind};
pub(crate) use value::NULL;
