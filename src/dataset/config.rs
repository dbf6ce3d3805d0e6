//! Dataset Configuration
//!
//! Construction-time parameters of the dataset handle.

use serde::{Deserialize, Serialize};

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATASET_PATH: &str = "data/business_sales.csv";

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ';';

/// Default number of rows per streaming read
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Dataset configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the delimited file (default: "data/business_sales.csv")
    #[serde(default = "default_path")]
    pub path: String,

    /// Field delimiter, a single ASCII character (default: ';')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Rows per chunk (default: 10000)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_path() -> String {
    DEFAULT_DATASET_PATH.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            delimiter: default_delimiter(),
            chunk_size: default_chunk_size(),
        }
    }
}
