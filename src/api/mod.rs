//! API Layer for salesdb
//!
//! Turns dataset results into typed `QueryResult`s. Transports (HTTP, CLI)
//! render those as the JSON envelope.
//!
//! # Design Principles
//!
//! - Never panics; every failure becomes a `QueryResult::Failure`
//! - Error kinds are stable strings callers can branch on
//! - Payloads keep file order and column order
//!
//! # Supported Operations
//!
//! - discover columns
//! - query (match-all or filtered)

mod handler;
mod request;
mod response;

pub use handler::{ColumnsPayload, DatasetApi, RowsPayload};
pub use request::{FilterRequest, LogParams};
pub use response::{Envelope, EnvelopeData, ErrorKind, QueryResult, Status};
