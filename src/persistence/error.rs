//! Error types for session persistence
//!
//! Only writes surface errors. Reads degrade to "no saved filters".

use std::io;
use thiserror::Error;

/// Errors that can occur while writing session state
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage key or session id with characters outside `[A-Za-z0-9_-]`
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// No directory to keep session state in
    #[error("Could not determine session directory")]
    NoSessionDir,
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
