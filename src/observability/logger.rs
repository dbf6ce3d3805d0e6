//! Structured JSON logging
//!
//! - One log line = one event, JSON encoded, written to stderr
//! - Level filter sits behind a reload layer so it can change at runtime
//! - `RUST_LOG` overrides the configured initial level

use tracing::level_filters::LevelFilter;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use super::events::Event;
use super::{ObservabilityError, ObservabilityResult};

/// Parse a level name, accepting the usual aliases in any case
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "critical" | "fatal" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Handle for changing the process log level after start-up
///
/// A detached control (no subscriber installed by us) validates levels but
/// changes nothing.
#[derive(Clone, Default)]
pub struct LogControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl std::fmt::Debug for LogControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogControl")
            .field("attached", &self.handle.is_some())
            .finish()
    }
}

impl LogControl {
    /// A control not connected to any subscriber
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Replace the active level filter
    pub fn set_level(&self, name: &str) -> ObservabilityResult<()> {
        let level = parse_level(name)
            .ok_or_else(|| ObservabilityError::UnknownLevel(name.to_string()))?;

        if let Some(handle) = &self.handle {
            handle
                .reload(EnvFilter::new(level.to_string()))
                .map_err(|e| ObservabilityError::Reload(e.to_string()))?;
            info!(
                event = Event::LogLevelChanged.as_str(),
                level = %level,
                "log level changed"
            );
        }
        Ok(())
    }
}

/// Install the global JSON subscriber
///
/// Returns a detached control if a global subscriber is already set.
pub fn init(level: &str) -> ObservabilityResult<LogControl> {
    let initial = parse_level(level)
        .ok_or_else(|| ObservabilityError::UnknownLevel(level.to_string()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(initial.to_string()));
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    Ok(match installed {
        Ok(()) => LogControl {
            handle: Some(handle),
        },
        Err(_) => LogControl::detached(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_aliases() {
        assert_eq!(parse_level("INFO"), Some(LevelFilter::INFO));
        assert_eq!(parse_level("warning"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("critical"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_detached_control_validates_levels() {
        let control = LogControl::detached();
        assert!(!control.is_attached());
        assert!(control.set_level("debug").is_ok());
        assert!(matches!(
            control.set_level("verbose"),
            Err(ObservabilityError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_init_rejects_unknown_level() {
        assert!(init("chatty").is_err());
    }
}
