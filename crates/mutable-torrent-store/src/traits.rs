//! RecordStore trait: the abstract interface to the DHT.
//!
//! The protocol layer never persists records itself. It reads and writes
//! through this trait, and the implementation owns routing, replication and
//! expiry. Bundled implementations are in-memory (tests, demos) and SQLite
//! (a local node's record table).

use std::sync::Arc;

use async_trait::async_trait;
use mutable_torrent_core::{MutableRecord, TargetId};

use crate::error::Result;

/// What the store did with an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The record replaced an older one or filled an empty slot.
    Stored,
    /// The identical record was already held; its lifetime was refreshed.
    Refreshed,
}

/// Acknowledgement of a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutAck {
    /// The slot written.
    pub target: TargetId,
    /// What happened to it.
    pub outcome: PutOutcome,
}

/// The RecordStore trait: async get/put of signed records by target.
///
/// # Design Notes
///
/// - **Absence is not an error**: `get` returns `Ok(None)` for an empty slot.
/// - **Acceptance**: implementations decide whether to accept a `put`
///   (signature, sequence ordering). Rejections come back as errors.
/// - **No timeouts**: callers cancel by dropping the future.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record currently held for `target`.
    async fn get(&self, target: &TargetId) -> Result<Option<MutableRecord>>;

    /// Offer a record for storage under `record.target()`.
    async fn put(&self, record: &MutableRecord) -> Result<PutAck>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn get(&self, target: &TargetId) -> Result<Option<MutableRecord>> {
        (**self).get(target).await
    }

    async fn put(&self, record: &MutableRecord) -> Result<PutAck> {
        (**self).put(record).await
    }
}
