//! Error handling for bulletin scanning operations.
//!
//! Separates retrieval failures (the bulletin text could not be obtained)
//! from parse failures (the text was obtained but a record is malformed),
//! so batch callers can report each class without collapsing them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BufkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to retrieve bulletin {source_name}: {reason}")]
    Retrieval { source_name: String, reason: String },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Bulletin file name does not follow <model>_<station>.buf: {path}")]
    InvalidBulletinName { path: PathBuf },

    #[error("Input directory not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Scan task failed for {path}: {reason}")]
    TaskFailed { path: PathBuf, reason: String },

    #[error("Directory traversal failed: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl BufkitError {
    /// Create a retrieval error for a named source
    pub fn retrieval(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Retrieval {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed record error at a 1-based line number
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the failure happened before any text was scanned
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval { .. })
    }
}

pub type Result<T> = std::result::Result<T, BufkitError>;
