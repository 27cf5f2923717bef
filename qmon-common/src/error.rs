//! Common error types for QMON

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for QMON operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can reach a caller of the library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid query parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Reasons a store could not be read
///
/// Never surfaced to callers: the loader logs these and substitutes the
/// store's empty default.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store file does not exist
    #[error("store file not found: {}", .0.display())]
    Unavailable(PathBuf),

    /// Store file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file is not valid JSON
    #[error("failed to parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
