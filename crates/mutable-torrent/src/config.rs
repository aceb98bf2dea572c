//! Client configuration and per-call options.

use std::fmt;

use mutable_torrent_core::{ed25519_verify, VerifyFn};

/// Configuration for [`MutableClient`](crate::MutableClient).
#[derive(Clone, Copy)]
pub struct ClientConfig {
    /// Signature check used when resolving. Defaults to [`ed25519_verify`],
    /// the same hook the bundled stores accept records with.
    pub verify: VerifyFn,
    /// Re-check the signature of every resolved record.
    pub verify_on_resolve: bool,
    /// When a mutable link already carries an `urn:btih:` hint, join with
    /// the hint instead of resolving.
    pub trust_link_hint: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            verify: ed25519_verify,
            verify_on_resolve: true,
            trust_link_hint: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("verify", &(self.verify as usize as *const ()))
            .field("verify_on_resolve", &self.verify_on_resolve)
            .field("trust_link_hint", &self.trust_link_hint)
            .finish()
    }
}

/// Options for [`MutableClient::publish`](crate::MutableClient::publish).
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Sequence for a first publication. Ignored once a record exists.
    pub sequence: Option<u64>,
}

impl PublishOptions {
    pub fn with_sequence(sequence: u64) -> Self {
        Self {
            sequence: Some(sequence),
        }
    }
}
