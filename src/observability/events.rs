//! Observability events for salesdb
//!
//! Every structured log line carries an `event` field naming one of these.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Start-up column discovery succeeded
    DatasetReady,
    /// HTTP listener bound
    ServerListening,
    /// Shutdown signal received
    ShutdownStart,

    // Query processing
    /// Query accepted and scan starting
    QueryStart,
    /// Chunk contributed no rows because it failed to read or bind
    ChunkSkipped,
    /// Scan finished with at least one match
    QueryComplete,
    /// Scan finished with zero matches
    NoMatch,
    /// Scan stopped early on cancellation
    QueryCancelled,
    /// Query rejected or failed
    QueryFailed,

    // Runtime control
    /// Log level changed at runtime
    LogLevelChanged,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasetReady => "DATASET_READY",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::QueryStart => "QUERY_START",
            Event::ChunkSkipped => "CHUNK_SKIPPED",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::NoMatch => "NO_MATCH",
            Event::QueryCancelled => "QUERY_CANCELLED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::LogLevelChanged => "LOG_LEVEL_CHANGED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
