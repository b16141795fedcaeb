//! Error types for ilandinfo.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ilandinfo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during a single CLI invocation.
///
/// Every variant is terminal: nothing is retried locally.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials file missing, unreadable or malformed
    #[error("Invalid credentials file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Transport or HTTP failure talking to the API
    #[error("API request to {endpoint} failed: {source}")]
    Api {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    /// Response did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Schema(String),

    /// Inventory object token not in the category table
    #[error("Unknown inventory object '{token}' (expected one of: {expected})")]
    UnknownCategory { token: String, expected: String },

    /// Missing or malformed command-line input
    #[error("{0}")]
    Argument(String),

    /// Failed to write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Wraps any transport-level cause as an `Api` error for `endpoint`.
    pub fn api(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}
