//! # salesdb HTTP Server Module
//!
//! Serves the dataset over HTTP with axum.
//!
//! # Endpoints
//!
//! - `/`, `/ping`, `/health`, `/versions` - Liveness and version
//! - `/columns` - Column discovery
//! - `/get_data` - Every row
//! - `/filter_data` - Rows matching a predicate
//!
//! Every route accepts a `log_lvl` query parameter that switches the process
//! log level before the request is handled.

pub mod config;
pub mod dataset_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{AppState, HttpServer};
