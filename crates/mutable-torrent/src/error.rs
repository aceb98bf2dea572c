//! Error types for the mutable torrent client.

use mutable_torrent_core::{CoreError, Ed25519PublicKey};
use mutable_torrent_store::StoreError;
use thiserror::Error;

use crate::swarm::SwarmError;

/// Errors that can occur during client operations.
///
/// Store failures keep their cause; the variant says which step failed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The public key was not valid hex or not 32 bytes.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The seed was not 32 bytes.
    #[error("invalid seed: expected 32 bytes, got {len}")]
    InvalidSeed { len: usize },

    /// The store returned a record that is not a valid pointer.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The record's signature did not verify.
    #[error("record signature did not verify")]
    InvalidSignature,

    /// Fetching the record during resolution failed.
    #[error("resolution failed: {0}")]
    ResolutionFailed(#[source] StoreError),

    /// Fetching the prior record or writing the new one failed.
    #[error("publish failed: {0}")]
    PublishFailed(#[source] StoreError),

    /// Fetching or rewriting the record during republish failed.
    #[error("republish failed: {0}")]
    RepublishFailed(#[source] StoreError),

    /// The identity has no record in the store.
    #[error("no record published for {0}")]
    NotPublished(Ed25519PublicKey),

    /// The prior sequence is already `u64::MAX`.
    #[error("sequence numbers exhausted for {0}")]
    SequenceExhausted(Ed25519PublicKey),

    /// The swarm client refused the join.
    #[error("swarm error: {0}")]
    Swarm(#[from] SwarmError),

    /// Any other core error (bad link, bad secret key).
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for ClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidPublicKey(msg) => ClientError::InvalidPublicKey(msg),
            CoreError::InvalidSeed { len } => ClientError::InvalidSeed { len },
            CoreError::MalformedRecord(msg) => ClientError::MalformedRecord(msg),
            CoreError::InvalidSignature => ClientError::InvalidSignature,
            other => ClientError::Core(other),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
