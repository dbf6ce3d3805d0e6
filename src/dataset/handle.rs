//! Dataset handle
//!
//! Identifies the backing file, its delimiter and the chunk size. Immutable
//! after construction and never touches the file until a read is requested;
//! every read opens its own cursor so concurrent queries share nothing
//! mutable.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::config::DatasetConfig;
use super::errors::{DatasetError, DatasetResult};

/// Handle to a delimited dataset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    path: PathBuf,
    delimiter: u8,
    chunk_size: usize,
}

impl DatasetHandle {
    /// Create a handle, validating delimiter and chunk size
    pub fn new(path: impl Into<PathBuf>, delimiter: char, chunk_size: usize) -> DatasetResult<Self> {
        if !delimiter.is_ascii() || delimiter == '\n' || delimiter == '\r' || delimiter == '"' {
            return Err(DatasetError::InvalidConfig(format!(
                "delimiter {:?} must be a single ASCII character other than a quote or line break",
                delimiter
            )));
        }
        if chunk_size == 0 {
            return Err(DatasetError::InvalidConfig(
                "chunk_size must be > 0".to_string(),
            ));
        }

        Ok(Self {
            path: path.into(),
            delimiter: delimiter as u8,
            chunk_size,
        })
    }

    /// Create a handle from a configuration section
    pub fn from_config(config: &DatasetConfig) -> DatasetResult<Self> {
        Self::new(&config.path, config.delimiter, config.chunk_size)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Open an independent RFC 4180 reader positioned before the header row
    pub(crate) fn open_reader(&self) -> DatasetResult<csv::Reader<File>> {
        let file = File::open(&self.path)
            .map_err(|e| self.unreadable(format!("cannot open file: {}", e)))?;

        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file))
    }

    /// Build a `SourceUnreadable` error for this handle
    pub(crate) fn unreadable(&self, reason: impl Into<String>) -> DatasetError {
        DatasetError::SourceUnreadable {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }
}
