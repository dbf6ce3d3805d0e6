//! Schema discovery
//!
//! Reads only the header record of the dataset. Column names are returned
//! exactly as written, in file order, duplicates included.

use serde::Serialize;

use super::errors::DatasetResult;
use super::handle::DatasetHandle;

/// Ordered column names of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the first column with the given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// Discover the column names from the first record of the dataset
pub fn discover_columns(handle: &DatasetHandle) -> DatasetResult<Schema> {
    let mut reader = handle.open_reader()?;

    let headers = reader
        .headers()
        .map_err(|e| handle.unreadable(format!("header row could not be parsed: {}", e)))?;

    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(handle.unreadable("no columns to parse from file"));
    }

    Ok(Schema::new(headers.iter().map(str::to_string).collect()))
}
