//! Observability subsystem for salesdb
//!
//! Provides:
//! - Structured JSON logging through `tracing`
//! - Runtime log-level control (per-request `log_lvl`)
//! - Named lifecycle and query events
//!
//! # Usage
//!
//! ```ignore
//! use salesdb::observability::{self, Event};
//!
//! let control = observability::init("info")?;
//! tracing::info!(event = Event::QueryComplete.as_str(), rows = 42, "query complete");
//! control.set_level("debug")?;
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init, parse_level, LogControl};

use thiserror::Error;

/// Observability errors
///
/// Observability failure must never fail a request; callers log and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),

    #[error("failed to reload log filter: {0}")]
    Reload(String),
}

impl ObservabilityError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ObservabilityError::UnknownLevel(_) => "SALES_UNKNOWN_LOG_LEVEL",
            ObservabilityError::Reload(_) => "SALES_OBSERVABILITY_FAILED",
        }
    }
}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
