//! Error types for metrics adapters.

use thiserror::Error;

/// Errors that can occur when fetching dashboard data.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// Failed to parse the response or file.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failed to read a local file.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The adapter was dropped or is not configured.
    #[error("Adapter unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
