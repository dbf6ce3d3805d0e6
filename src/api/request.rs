//! API request types

use serde::{Deserialize, Serialize};

/// Body of a filter request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Predicate text; absent or blank matches every row
    #[serde(default)]
    pub query: Option<String>,
}

impl FilterRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Query-string parameters accepted by every route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogParams {
    /// Log level to switch the process to before handling the request
    pub log_lvl: Option<String>,
}
