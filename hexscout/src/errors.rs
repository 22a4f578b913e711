//! Error types for hexscout.
//!
//! Every error that reaches the caller is fatal for the whole run: pattern
//! problems are detected before any search work starts, and I/O problems are
//! detected before the engine is invoked at all.
//!
//! ```rust,ignore
//! match hexscout::search(&config) {
//!     Ok(report) => println!("{}", report.to_json()?),
//!     Err(SearchError::InvalidFormat(pattern)) => eprintln!("bad pattern {pattern}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while loading inputs or preparing patterns
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Invalid pattern container: {0}")]
    InvalidContainerFormat(String),
    #[error("Pattern invalid format -> ({0})")]
    InvalidFormat(String),
    #[error("Invalid regex pattern -> ({pattern}): {reason}")]
    InvalidRegexSyntax { pattern: String, reason: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn invalid_container(msg: impl Into<String>) -> Self {
        Self::InvalidContainerFormat(msg.into())
    }

    pub fn invalid_format(pattern: impl Into<String>) -> Self {
        Self::InvalidFormat(pattern.into())
    }

    pub fn invalid_regex(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidRegexSyntax {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The offending pattern text, for errors caused by a single pattern
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::InvalidFormat(pattern) => Some(pattern),
            Self::InvalidRegexSyntax { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}
