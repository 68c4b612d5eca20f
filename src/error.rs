//! Error types for the undoable run-queue.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    // Action failures
    #[error("{message}")]
    NotFound { path: String, message: String },

    #[error("{message}")]
    AlreadyExists { path: String, message: String },

    #[error("{message}")]
    NotEmpty { path: String, message: String },

    #[error("Refusing to operate on the root folder")]
    RootNode,

    #[error("Action used before initialization: {0}")]
    Uninitialized(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Run-queue errors
    #[error("Run-queue failed after {completed} successful action(s): {source}")]
    RunQueue {
        completed: usize,
        #[source]
        source: Arc<Error>,
    },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Plan errors
    #[error("Invalid plan file: {0}")]
    InvalidPlanFile(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Not-found error with the default message.
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        let path = path.into();
        Error::NotFound {
            message: format!("Path not found: {}", path),
            path,
        }
    }

    /// Already-exists error with the default message.
    pub fn already_exists<S: Into<String>>(path: S) -> Self {
        let path = path.into();
        Error::AlreadyExists {
            message: format!("Path already exists: {}", path),
            path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }

    /// Number of successfully completed actions, for run-queue errors.
    pub fn completed(&self) -> Option<usize> {
        match self {
            Error::RunQueue { completed, .. } => Some(*completed),
            _ => None,
        }
    }
}
