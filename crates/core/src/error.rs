//! Error types for pagefeed operations.
//!
//! This module defines the main error type [`PagefeedError`]. Only failures
//! that should abort a whole source (or the whole run, for configuration
//! problems) are represented here. Soft extraction anomalies such as a
//! malformed JSON-LD block or an unparseable date never become errors; they
//! are reported through [`crate::observe::Observer`] instead.
//!
//! # Example
//!
//! ```rust
//! use pagefeed_core::{PagefeedError, Result};
//!
//! fn require_id(id: &str) -> Result<&str> {
//!     if id.trim().is_empty() {
//!         return Err(PagefeedError::ConfigError("source id is empty".to_string()));
//!     }
//!     Ok(id)
//! }
//! # assert!(require_id("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for feed generation.
#[derive(Error, Debug)]
pub enum PagefeedError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues and non-success
    /// status codes returned by the listing page.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing or CSS selector errors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Source configuration errors.
    ///
    /// Returned when the config document is missing, malformed, or a source
    /// row violates its invariants.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A configured include/exclude URL pattern is not a valid regex.
    #[error("Invalid URL pattern {pattern:?} for source {source_id}: {message}")]
    InvalidPattern { source_id: String, pattern: String, message: String },

    /// Feed document rendering errors.
    #[error("Failed to serialize feed: {0}")]
    SerializeError(String),
}

/// Result type alias for PagefeedError.
pub type Result<T> = std::result::Result<T, PagefeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PagefeedError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_invalid_pattern_error() {
        let err = PagefeedError::InvalidPattern {
            source_id: "blog".to_string(),
            pattern: "([".to_string(),
            message: "unclosed group".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("blog"));
        assert!(message.contains("(["));
    }

    #[test]
    fn test_timeout_error() {
        let err = PagefeedError::Timeout { timeout: 20 };
        assert!(err.to_string().contains("20"));
    }
}
