//! CLI module for salesdb
//!
//! Provides command-line interface for:
//! - serve: Check the dataset and serve HTTP
//! - columns: One-shot column discovery
//! - query: One-shot query execution

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, DatasetArgs};
pub use commands::{columns, query, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{write_json, write_json_to};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
