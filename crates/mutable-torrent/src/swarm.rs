//! Swarm abstraction for the join step of add-by-link.
//!
//! The client never talks to peers itself. Once a link is rewritten it hands
//! it to a [`Swarm`] and wraps whatever handle comes back.

use std::ops::Deref;
use std::path::PathBuf;

use async_trait::async_trait;
use mutable_torrent_core::Ed25519PublicKey;
use thiserror::Error;

/// Errors reported by a swarm client.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// The swarm client could not interpret the link.
    #[error("swarm rejected link: {0}")]
    InvalidLink(String),

    /// Joining failed for any other reason.
    #[error("join failed: {0}")]
    Join(String),
}

/// Options passed through to the swarm client untouched.
#[derive(Debug, Clone, Default)]
pub struct JoinOptions {
    /// Where downloaded content should be written.
    pub path: Option<PathBuf>,
}

impl JoinOptions {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// Swarm trait: join a swarm by link.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Swarm: Send + Sync {
    /// The swarm client's own handle type.
    type Handle: Send;

    /// Join the swarm described by `link`. Returns once peer discovery has
    /// started.
    async fn join(&self, link: &str, options: &JoinOptions) -> Result<Self::Handle, SwarmError>;
}

/// Which identity a swarm handle was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableOrigin {
    /// The identity named by the link.
    pub public_key: Ed25519PublicKey,
    /// Sequence of the resolved record, `None` when a link hint was trusted.
    pub sequence: Option<u64>,
    /// The rewritten link handed to the swarm.
    pub link: String,
}

/// A swarm handle, plus its mutable origin when it came from a mutable link.
#[derive(Debug)]
pub struct SwarmHandle<H> {
    inner: H,
    origin: Option<MutableOrigin>,
}

impl<H> SwarmHandle<H> {
    pub(crate) fn direct(inner: H) -> Self {
        Self {
            inner,
            origin: None,
        }
    }

    pub(crate) fn mutable(inner: H, origin: MutableOrigin) -> Self {
        Self {
            inner,
            origin: Some(origin),
        }
    }

    /// The identity metadata, if the handle came from a mutable link.
    pub fn origin(&self) -> Option<&MutableOrigin> {
        self.origin.as_ref()
    }

    pub fn is_mutable(&self) -> bool {
        self.origin.is_some()
    }

    /// The public key the swarm was reached through.
    pub fn public_key(&self) -> Option<&Ed25519PublicKey> {
        self.origin.as_ref().map(|o| &o.public_key)
    }

    /// The resolved sequence.
    pub fn sequence(&self) -> Option<u64> {
        self.origin.as_ref().and_then(|o| o.sequence)
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> Deref for SwarmHandle<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.inner
    }
}

/// A swarm that only records what it was asked to join.
///
/// Used by tests and the demo binaries in place of a real torrent client.
pub mod memory {
    use super::*;
    use std::sync::Mutex;

    use mutable_torrent_core::{InfoHash, MagnetLink};

    /// Handle returned by [`MemorySwarm`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MemoryTorrent {
        /// The link as received.
        pub link: String,
        /// The first `urn:btih:` topic in the link, if any.
        pub info_hash: Option<InfoHash>,
        pub options_path: Option<PathBuf>,
    }

    /// In-memory swarm implementation.
    #[derive(Default)]
    pub struct MemorySwarm {
        joined: Mutex<Vec<String>>,
    }

    impl MemorySwarm {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every link joined so far, in order.
        pub fn joined(&self) -> Vec<String> {
            self.joined
                .lock()
                .map(|links| links.clone())
                .unwrap_or_default()
        }

        pub fn join_count(&self) -> usize {
            self.joined.lock().map(|links| links.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl Swarm for MemorySwarm {
        type Handle = MemoryTorrent;

        async fn join(&self, link: &str, options: &JoinOptions) -> Result<MemoryTorrent, SwarmError> {
            let info_hash = match MagnetLink::parse(link) {
                Ok(parsed) => parsed
                    .info_hash()
                    .map_err(|e| SwarmError::InvalidLink(e.to_string()))?,
                Err(_) => InfoHash::from_hex(link).ok(),
            };

            self.joined
                .lock()
                .map_err(|e| SwarmError::Join(format!("lock poisoned: {e}")))?
                .push(link.to_string());

            Ok(MemoryTorrent {
                link: link.to_string(),
                info_hash,
                options_path: options.path.clone(),
            })
        }
    }
}
