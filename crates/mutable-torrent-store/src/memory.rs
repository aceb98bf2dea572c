//! In-memory implementation of the RecordStore trait.
//!
//! Behaves like a single honest DHT node: it applies the [`AcceptPolicy`]
//! on every put and keeps one record per target. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use mutable_torrent_core::{MutableRecord, TargetId};

use crate::error::{Result, StoreError};
use crate::policy::AcceptPolicy;
use crate::traits::{PutAck, RecordStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    records: RwLock<HashMap<TargetId, MutableRecord>>,
    policy: AcceptPolicy,
}

impl MemoryStore {
    /// Create a new empty store with the default acceptance policy.
    pub fn new() -> Self {
        Self::with_policy(AcceptPolicy::default())
    }

    /// Create a new empty store with a custom acceptance policy.
    pub fn with_policy(policy: AcceptPolicy) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Place a record without running the acceptance policy.
    ///
    /// Lets tests seed the slot with data an honest node would never hold.
    pub fn insert_unchecked(&self, target: TargetId, record: MutableRecord) -> Result<()> {
        self.write()?.insert(target, record);
        Ok(())
    }

    /// Drop the record for `target`, as a DHT does when a record expires.
    pub fn expire(&self, target: &TargetId) -> Result<Option<MutableRecord>> {
        Ok(self.write()?.remove(target))
    }

    /// Number of targets held.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TargetId, MutableRecord>>> {
        self.records
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<TargetId, MutableRecord>>> {
        self.records
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, target: &TargetId) -> Result<Option<MutableRecord>> {
        Ok(self.read()?.get(target).cloned())
    }

    async fn put(&self, record: &MutableRecord) -> Result<PutAck> {
        let target = record.target();
        let mut records = self.write()?;

        let outcome = self.policy.check(records.get(&target), record)?;
        records.insert(target, record.clone());
        debug!(target_id = %target, seq = record.seq, ?outcome, "record accepted");

        Ok(PutAck { target, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PutOutcome;
    use mutable_torrent_core::{InfoHash, Keypair, Value};

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x11; 32]).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let record = MutableRecord::pointer(&keypair(), 0, &InfoHash::from_bytes([1; 20]));

        let ack = store.put(&record).await.unwrap();
        assert_eq!(ack.target, record.target());
        assert_eq!(ack.outcome, PutOutcome::Stored);

        let fetched = store.get(&record.target()).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_memory_store_missing_target() {
        let store = MemoryStore::new();
        let target = TargetId::derive(&keypair().public_key());
        assert!(store.get(&target).await.unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_refresh_is_idempotent() {
        let store = MemoryStore::new();
        let record = MutableRecord::pointer(&keypair(), 3, &InfoHash::from_bytes([1; 20]));

        store.put(&record).await.unwrap();
        let ack = store.put(&record).await.unwrap();
        assert_eq!(ack.outcome, PutOutcome::Refreshed);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(&record.target()).await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_regression() {
        let store = MemoryStore::new();
        let newer = MutableRecord::pointer(&keypair(), 4, &InfoHash::from_bytes([2; 20]));
        let older = MutableRecord::pointer(&keypair(), 3, &InfoHash::from_bytes([1; 20]));

        store.put(&newer).await.unwrap();
        let err = store.put(&older).await.unwrap_err();
        assert!(matches!(err, StoreError::SequenceTooLow { current: 4, offered: 3 }));
        assert_eq!(store.get(&newer.target()).await.unwrap().unwrap(), newer);
    }

    #[tokio::test]
    async fn test_insert_unchecked_and_expire() {
        let store = MemoryStore::new();
        let junk = MutableRecord::sign(&keypair(), 0, Value::Integer(7));
        let target = junk.target();

        store.insert_unchecked(target, junk.clone()).unwrap();
        assert_eq!(store.get(&target).await.unwrap(), Some(junk));

        store.expire(&target).unwrap();
        assert!(store.get(&target).await.unwrap().is_none());
    }
}
