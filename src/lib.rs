//! Leadfilter - faceted filter state for lead lists
//!
//! This library keeps the selections of a lead-list filter drawer consistent
//! across their four representations: control state, derived chips, the
//! resolved query payload, and the persisted snapshot that rehydrates them.

use thiserror::Error;

pub mod assist;
pub mod cli;
pub mod config;
pub mod drawer;
pub mod engine;
pub mod facets;
pub mod output;
pub mod persistence;
pub mod resolver;
pub mod snapshot;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum LeadFilterError {
    /// Persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] persistence::PersistenceError),
    /// Autocomplete lookup error
    #[error("Lookup error: {0}")]
    Assist(#[from] assist::AssistError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for LeadFilterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
