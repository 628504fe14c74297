//! Error types for the storage layer

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A row could not be converted back into a domain value
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A record was rejected before reaching the database
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A mutex guarding the store was poisoned by a panicking holder
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
