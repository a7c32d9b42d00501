//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A key contained characters the backend cannot represent.
    #[error("invalid storage key: {key:?}")]
    InvalidKey {
        /// The offending key.
        key: String,
    },

    /// Another process holds the store directory lock.
    #[error("store locked: another process has exclusive access")]
    Locked,

    /// The store path exists but is not usable as a store directory.
    #[error("invalid store path: {message}")]
    InvalidPath {
        /// Description of the problem.
        message: String,
    },
}

impl StorageError {
    /// Creates an invalid-key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Creates an invalid-path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }
}
