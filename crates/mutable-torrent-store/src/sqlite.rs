//! SQLite implementation of the RecordStore trait.
//!
//! Backs a local node's record table. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking. The same [`AcceptPolicy`] as
//! the in-memory store decides what gets written.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use mutable_torrent_core::{Ed25519PublicKey, Ed25519Signature, MutableRecord, TargetId, Value};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::policy::AcceptPolicy;
use crate::traits::{PutAck, PutOutcome, RecordStore};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    policy: AcceptPolicy,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Replace the acceptance policy.
    pub fn with_policy(mut self, policy: AcceptPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            policy: AcceptPolicy::default(),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

/// Raw column values of a stored record.
struct RecordRow {
    public_key: Vec<u8>,
    seq: i64,
    value: Vec<u8>,
    signature: Vec<u8>,
}

impl RecordRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            public_key: row.get("public_key")?,
            seq: row.get("seq")?,
            value: row.get("value")?,
            signature: row.get("signature")?,
        })
    }

    fn into_record(self) -> Result<MutableRecord> {
        let public_key: [u8; 32] = self
            .public_key
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::InvalidData("public_key is not 32 bytes".into()))?;
        let signature = Ed25519Signature::try_from(self.signature.as_slice())
            .map_err(|_| StoreError::InvalidData("signature is not 64 bytes".into()))?;

        Ok(MutableRecord {
            public_key: Ed25519PublicKey::from_bytes(public_key),
            seq: self.seq as u64,
            value: decode_value(&self.value)?,
            signature,
        })
    }
}

fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn decode_value(bytes: &[u8]) -> Result<Value> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn select_record(conn: &Connection, target: &TargetId) -> Result<Option<MutableRecord>> {
    conn.query_row(
        "SELECT public_key, seq, value, signature FROM records WHERE target = ?1",
        params![target.as_bytes().as_slice()],
        RecordRow::from_row,
    )
    .optional()?
    .map(RecordRow::into_record)
    .transpose()
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, target: &TargetId) -> Result<Option<MutableRecord>> {
        let target = *target;
        self.blocking(move |conn| select_record(conn, &target)).await
    }

    async fn put(&self, record: &MutableRecord) -> Result<PutAck> {
        let record = record.clone();
        let policy = self.policy;

        self.blocking(move |conn| {
            let target = record.target();
            let tx = conn.transaction()?;

            let existing = select_record(&tx, &target)?;
            let outcome = policy.check(existing.as_ref(), &record)?;
            let now = crate::now_millis();

            match outcome {
                PutOutcome::Stored => {
                    tx.execute(
                        "INSERT OR REPLACE INTO records (
                            target, public_key, seq, value, signature, stored_at, refreshed_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                        params![
                            target.as_bytes().as_slice(),
                            record.public_key.as_bytes().as_slice(),
                            record.seq as i64,
                            encode_value(&record.value)?,
                            record.signature.as_bytes().as_slice(),
                            now,
                        ],
                    )?;
                }
                PutOutcome::Refreshed => {
                    tx.execute(
                        "UPDATE records SET refreshed_at = ?2 WHERE target = ?1",
                        params![target.as_bytes().as_slice(), now],
                    )?;
                }
            }

            tx.commit()?;
            debug!(target_id = %target, seq = record.seq, ?outcome, "record accepted");
            Ok(PutAck { target, outcome })
        })
        .await
    }
}
