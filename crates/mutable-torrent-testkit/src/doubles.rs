//! Test doubles: a store that fails on demand and a swarm that refuses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mutable_torrent::{JoinOptions, Swarm, SwarmError};
use mutable_torrent_core::{MutableRecord, TargetId};
use mutable_torrent_store::{PutAck, RecordStore, Result, StoreError};

/// Wraps a store, records every call and fails reads or writes on demand.
pub struct FlakyStore<S> {
    inner: S,
    fail_gets: AtomicBool,
    fail_puts: AtomicBool,
    gets: Mutex<Vec<TargetId>>,
    puts: Mutex<Vec<MutableRecord>>,
}

impl<S: RecordStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_gets: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
            gets: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Make every subsequent `get` fail with `Unavailable`.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail with `Unavailable`.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Targets read so far, including failed reads.
    pub fn gets(&self) -> Vec<TargetId> {
        self.gets.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Records offered so far, including failed writes.
    pub fn puts(&self) -> Vec<MutableRecord> {
        self.puts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for FlakyStore<S> {
    async fn get(&self, target: &TargetId) -> Result<Option<MutableRecord>> {
        if let Ok(mut gets) = self.gets.lock() {
            gets.push(*target);
        }
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("get disabled".into()));
        }
        self.inner.get(target).await
    }

    async fn put(&self, record: &MutableRecord) -> Result<PutAck> {
        if let Ok(mut puts) = self.puts.lock() {
            puts.push(record.clone());
        }
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("put disabled".into()));
        }
        self.inner.put(record).await
    }
}

/// A swarm that refuses every join.
#[derive(Debug, Default)]
pub struct RejectingSwarm {
    attempts: Mutex<Vec<String>>,
}

impl RejectingSwarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links the swarm was asked to join.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Swarm for RejectingSwarm {
    type Handle = ();

    async fn join(&self, link: &str, _options: &JoinOptions) -> std::result::Result<(), SwarmError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(link.to_string());
        }
        Err(SwarmError::Join(format!("refusing {link}")))
    }
}
