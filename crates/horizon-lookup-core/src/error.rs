//! Error types for Horizon Lookup core systems.

use std::fmt;

/// The main error type for core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The task queue a sender was posting to has been dropped.
    TaskQueueClosed,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskQueueClosed => write!(f, "The task queue has been closed"),
        }
    }
}

impl std::error::Error for CoreError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
