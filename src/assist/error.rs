//! Error types for autocomplete lookups
//!
//! Lookup failures never reach the user; the suggestion list just stays
//! empty. These errors exist so sources and callers can log them.

use thiserror::Error;

/// Errors from a suggestion source
#[derive(Debug, Error)]
pub enum AssistError {
    /// HTTP request failed or returned an error status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Source cannot serve lookups
    #[error("Suggestion source unavailable: {0}")]
    Unavailable(String),
}
