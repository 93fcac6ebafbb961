//! Error types for loading remote payloads.

use std::fmt;

/// Why a fetch failed.
///
/// Errors are `Clone` so a single failure can be reported both to a
/// refresh callback and to signal listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The URL could not be parsed.
    InvalidUrl(String),
    /// A header name or value was rejected.
    InvalidHeader(String),
    /// The proxy URL was rejected.
    Proxy(String),
    /// No connection could be established.
    Connection(String),
    /// The request or connect timeout elapsed.
    Timeout,
    /// The redirect limit was exceeded.
    TooManyRedirects,
    /// The server answered with a non-2xx status.
    HttpStatus {
        /// Status code.
        status: u16,
        /// Start of the response body, if there was one.
        message: Option<String>,
    },
    /// The body was not valid JSON.
    Json(String),
    /// Any other transport failure.
    Request(String),
}

impl NetworkError {
    /// The status code of an error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server was reached and answered.
    pub fn is_response_error(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Json(_))
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::Proxy(msg) => write!(f, "Invalid proxy: {msg}"),
            Self::Connection(msg) => write!(f, "Could not connect: {msg}"),
            Self::Timeout => f.write_str("Request timed out"),
            Self::TooManyRedirects => f.write_str("Too many redirects"),
            Self::HttpStatus {
                status,
                message: Some(msg),
            } => write!(f, "HTTP {status}: {msg}"),
            Self::HttpStatus { status, message: None } => write!(f, "HTTP {status}"),
            Self::Json(msg) => write!(f, "Malformed JSON payload: {msg}"),
            Self::Request(msg) => write!(f, "Request failed: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
