//! Configuration file handling
//!
//! The config file is optional JSON; every field has a default. Command-line
//! flags are applied on top and the merged result is validated once.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetConfig, DatasetHandle};
use crate::http_server::HttpServerConfig;
use crate::observability::parse_level;

use super::args::DatasetArgs;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub server: HttpServerConfig,

    /// Initial log level (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Query timeout in milliseconds; 0 disables (default: 30000)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_query_timeout_ms() -> u64 {
    30_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            server: HttpServerConfig::default(),
            log_level: default_log_level(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Resolve the effective configuration for a command
    pub fn resolve(args: &DatasetArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, args: &DatasetArgs) {
        if let Some(path) = &args.dataset {
            self.dataset.path = path.clone();
        }
        if let Some(delimiter) = args.delimiter {
            self.dataset.delimiter = delimiter;
        }
        if let Some(chunk_size) = args.chunk_size {
            self.dataset.chunk_size = chunk_size;
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if parse_level(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("server.host must not be empty"));
        }

        DatasetHandle::from_config(&self.dataset)
            .map_err(|e| CliError::config_error(e.to_string()))?;

        Ok(())
    }

    /// Query timeout, `None` when disabled
    pub fn query_timeout(&self) -> Option<Duration> {
        match self.query_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dataset.chunk_size, 10_000);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(r#"{"dataset": {"chunk_size": 500}, "query_timeout_ms": 0}"#);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dataset.chunk_size, 500);
        assert_eq!(config.dataset.delimiter, ';');
        assert_eq!(config.query_timeout(), None);
    }

    #[test]
    fn test_flags_override_file() {
        let file = write_config(r#"{"dataset": {"path": "a.csv", "chunk_size": 500}}"#);
        let args = DatasetArgs {
            config: Some(file.path().to_path_buf()),
            dataset: Some("b.csv".into()),
            chunk_size: Some(7),
            ..Default::default()
        };
        let config = Config::resolve(&args).unwrap();
        assert_eq!(config.dataset.path, "b.csv");
        assert_eq!(config.dataset.chunk_size, 7);
    }

    #[test]
    fn test_rejects_zero_chunk_size() {
        let args = DatasetArgs {
            chunk_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(Config::resolve(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let args = DatasetArgs {
            log_level: Some("chatty".into()),
            ..Default::default()
        };
        assert!(Config::resolve(&args).is_err());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config =
            serde_json::from_str(include_str!("../../salesdb.example.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_invalid_json() {
        let file = write_config("{not json");
        assert!(Config::load(file.path()).is_err());
    }
}
