//! CLI command implementations
//!
//! `serve` follows a strict boot sequence:
//! 1. Resolve configuration (file, then flags)
//! 2. Initialize logging
//! 3. Open the dataset handle and read its columns
//! 4. Serve HTTP until Ctrl-C
//!
//! A failed column read stops the process before the listener is bound.

use serde::Serialize;
use tracing::info;

use crate::api::{DatasetApi, QueryResult};
use crate::dataset::{CancelFlag, DatasetHandle, QueryEngine};
use crate::http_server::{AppState, HttpServer};
use crate::observability::{self, Event, LogControl};

use super::args::{Command, DatasetArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Run a CLI command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            dataset,
            host,
            port,
        } => serve(&dataset, host, port),
        Command::Columns { dataset } => columns(&dataset),
        Command::Query { dataset, predicate } => query(&dataset, predicate.as_deref()),
    }
}

/// Boot the dataset and serve HTTP
pub fn serve(args: &DatasetArgs, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::resolve(args)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let (api, log) = boot(&config)?;
    let state = AppState::new(api, log).with_query_timeout(config.query_timeout());
    let server = HttpServer::new(config.server.clone(), state);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::Server(e.to_string()))
}

/// Print the dataset's columns
pub fn columns(args: &DatasetArgs) -> CliResult<()> {
    let config = Config::resolve(args)?;
    let api = open_api(&config)?;
    observability::init(&config.log_level)?;

    emit(api.discover_columns())
}

/// Run one query and print the result
pub fn query(args: &DatasetArgs, predicate: Option<&str>) -> CliResult<()> {
    let config = Config::resolve(args)?;
    let api = open_api(&config)?;
    observability::init(&config.log_level)?;

    emit(api.query(predicate, &CancelFlag::new()))
}

/// Initialize logging, open the dataset and read its columns
fn boot(config: &Config) -> CliResult<(DatasetApi, LogControl)> {
    let log = observability::init(&config.log_level)?;
    info!(
        event = Event::ConfigLoaded.as_str(),
        dataset = %config.dataset.path,
        chunk_size = config.dataset.chunk_size,
        addr = %config.server.socket_addr(),
        "configuration loaded"
    );

    let api = open_api(config)?;
    let schema = api.engine().discover_columns()?;
    info!(
        event = Event::DatasetReady.as_str(),
        path = %api.engine().handle().path().display(),
        columns = schema.len(),
        "dataset ready"
    );

    Ok((api, log))
}

fn open_api(config: &Config) -> CliResult<DatasetApi> {
    let handle = DatasetHandle::from_config(&config.dataset)?;
    Ok(DatasetApi::new(QueryEngine::new(handle)))
}

/// Print the envelope; non-success outcomes fail the command
fn emit<T: Serialize>(result: QueryResult<T>) -> CliResult<()> {
    let code = result.code();
    let success = result.is_success();
    write_json(&result.into_envelope())?;

    if success {
        Ok(())
    } else {
        Err(CliError::CommandFailed { code })
    }
}
