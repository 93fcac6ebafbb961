//! Error types for the lookup engine.

use std::path::PathBuf;

use horizon_lookup_net::NetworkError;

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors that can occur while configuring the engine or loading records.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The lookup pattern is not a valid regular expression.
    #[error("Invalid lookup pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Fetching the record set failed.
    #[error("Failed to fetch records: {0}")]
    Fetch(#[from] NetworkError),

    /// The fetched payload is not an array of records.
    #[error("Invalid record payload: {0}")]
    Payload(String),

    /// The configured data property is missing from the payload.
    #[error("Payload has no data property '{0}'")]
    MissingDataProperty(String),

    /// A configuration document could not be parsed.
    #[error("Failed to parse {format} configuration: {message}")]
    ConfigParse {
        format: &'static str,
        message: String,
    },

    /// A configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LookupError {
    /// Create a payload error.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
