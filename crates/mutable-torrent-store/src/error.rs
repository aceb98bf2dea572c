//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The record's signature did not pass the acceptance hook.
    #[error("signature rejected for target {target}")]
    InvalidSignature { target: String },

    /// The store holds a newer record for this target.
    #[error("sequence {offered} is lower than stored sequence {current}")]
    SequenceTooLow { current: u64, offered: u64 },

    /// A different record with the same sequence is already stored.
    #[error("a different record with sequence {seq} is already stored")]
    SequenceConflict { seq: u64 },

    /// The encoded value exceeds the store's size limit.
    #[error("value is {len} bytes, limit is {max}")]
    ValueTooLarge { len: usize, max: usize },

    /// The backend could not serve the request (network, lock, task failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    /// Whether the store refused the record (as opposed to failing to run).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidSignature { .. }
                | StoreError::SequenceTooLow { .. }
                | StoreError::SequenceConflict { .. }
                | StoreError::ValueTooLarge { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
