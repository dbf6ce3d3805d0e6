//! salesdb - chunked, filterable access to a delimited sales dataset
//!
//! The dataset is streamed in fixed-size chunks and filtered with a small
//! boolean predicate language, then served over HTTP or the command line.

pub mod api;
pub mod cli;
pub mod dataset;
pub mod http_server;
pub mod observability;
pub mod predicate;
