//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage area is not a valid key/value document
    #[error("Corrupt storage area: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Lock guarding the storage area was poisoned
    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
