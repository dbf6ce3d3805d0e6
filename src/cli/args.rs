//! CLI argument definitions using clap
//!
//! Commands:
//! - salesdb serve [--host <host>] [--port <port>]
//! - salesdb columns
//! - salesdb query [--predicate <expr>]
//!
//! Every command accepts the dataset flags, which override the config file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// salesdb - query a delimited sales dataset over HTTP
#[derive(Parser, Debug)]
#[command(name = "salesdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the delimited dataset file
    #[arg(long)]
    pub dataset: Option<String>,

    /// Field delimiter (single ASCII character)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Rows per streaming chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Initial log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the dataset's columns and exit
    Columns {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// Run one query, print the result and exit
    Query {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Filter predicate; every row when omitted
        #[arg(long)]
        predicate: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
