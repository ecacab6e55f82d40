use thiserror::Error;

/// Errors that can occur while running a search query
#[derive(Error, Debug)]
pub enum SearchError {
    /// The query was empty after trimming
    #[error("Search query cannot be empty")]
    EmptyQuery,

    /// Request failed before a response was received (includes timeouts)
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    StatusError { url: String, status: u16 },

    /// Response body was not the expected JSON shape
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl SearchError {
    /// Whether this error came from talking to a remote service, as opposed to
    /// bad input or local configuration.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SearchError::FetchError(_) | SearchError::StatusError { .. } | SearchError::ParseError(_)
        )
    }
}
