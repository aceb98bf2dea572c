//! # Mutable Torrent Store
//!
//! Storage abstraction for mutable records. The protocol layer talks to the
//! DHT only through the [`RecordStore`] trait; this crate defines it and
//! ships two implementations.
//!
//! ## Key Types
//!
//! - [`RecordStore`] - The async get/put interface
//! - [`AcceptPolicy`] - Signature, size and sequence checks on `put`
//! - [`MemoryStore`] - In-memory single-node store for tests and demos
//! - [`SqliteStore`] - SQLite-backed record table for a persistent node
//! - [`PutAck`] - Result of an accepted `put`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mutable_torrent_core::{InfoHash, Keypair, MutableRecord};
//! use mutable_torrent_store::{MemoryStore, RecordStore};
//!
//! async fn example() {
//!     let store = MemoryStore::new();
//!     let keypair = Keypair::generate();
//!     let record = MutableRecord::pointer(&keypair, 0, &InfoHash::from_bytes([0; 20]));
//!
//!     store.put(&record).await.unwrap();
//!     let held = store.get(&record.target()).await.unwrap();
//!     assert_eq!(held, Some(record));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Highest sequence wins**: a lower sequence is rejected
//! - **Republish is a refresh**: the identical record is accepted again
//! - **Same sequence, new content**: rejected as a conflict

pub mod error;
pub mod memory;
pub mod migration;
pub mod policy;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use policy::AcceptPolicy;
pub use sqlite::SqliteStore;
pub use traits::{PutAck, PutOutcome, RecordStore};

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
