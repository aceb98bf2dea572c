//! # Mutable Torrent
//!
//! Mutable pointers for torrents: a fixed Ed25519 identity that resolves,
//! through a DHT, to whatever info-hash its owner last published.
//!
//! ## Overview
//!
//! - **Publish**: sign `{ih: <info-hash>}` under the next sequence number
//! - **Resolve**: public key -> current record -> `{info_hash, sequence}`
//! - **Republish**: re-announce the held record unchanged, keeping it alive
//! - **Add by link**: rewrite `magnet:?xs=urn:btpk:<key>` into a joinable link
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mutable_torrent::{ClientConfig, JoinOptions, MutableClient, PublishOptions};
//! use mutable_torrent::core::{InfoHash, Keypair};
//! use mutable_torrent::store::MemoryStore;
//! use mutable_torrent::swarm::memory::MemorySwarm;
//!
//! async fn example() {
//!     let client = MutableClient::new(MemoryStore::new(), MemorySwarm::new(), ClientConfig::default());
//!     let keypair = Keypair::generate();
//!
//!     let receipt = client
//!         .publish(&keypair, &InfoHash::from_bytes([0xab; 20]), PublishOptions::default())
//!         .await
//!         .unwrap();
//!
//!     // Anyone holding the link gets the current content.
//!     let handle = client
//!         .add_by_link(&receipt.magnet_link, JoinOptions::default())
//!         .await
//!         .unwrap();
//!     assert_eq!(handle.sequence(), Some(receipt.sequence));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `mutable_torrent::core` - Identities, records, links
//! - `mutable_torrent::store` - The DHT abstraction, in-memory and SQLite stores

pub mod client;
pub mod config;
pub mod error;
pub mod swarm;

// Re-export component crates
pub use mutable_torrent_core as core;
pub use mutable_torrent_store as store;

// Re-export main types for convenience
pub use client::{MutableClient, PublishReceipt, ResolvedPointer};
pub use config::{ClientConfig, PublishOptions};
pub use error::{ClientError, Result};
pub use swarm::{JoinOptions, MutableOrigin, Swarm, SwarmError, SwarmHandle};

// Re-export commonly used core types
pub use mutable_torrent_core::{
    Ed25519PublicKey, InfoHash, Keypair, MagnetLink, MutableRecord, TargetId,
};
