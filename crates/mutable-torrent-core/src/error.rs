//! Error types for the mutable torrent core.

use thiserror::Error;

/// Errors raised while building or interpreting identities, records and links.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("invalid seed: expected 32 bytes, got {len}")]
    InvalidSeed { len: usize },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("invalid link: {0}")]
    InvalidLink(String),

    #[error("encoded value is {len} bytes, limit is {max}")]
    ValueTooLarge { len: usize, max: usize },
}
