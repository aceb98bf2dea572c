//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use mutable_torrent::swarm::memory::MemorySwarm;
use mutable_torrent::{ClientConfig, MutableClient};
use mutable_torrent_core::{
    Ed25519PublicKey, InfoHash, Keypair, MagnetLink, MutableRecord, TargetId,
};
use mutable_torrent_store::MemoryStore;

/// A test fixture with a keypair, a memory store and a memory swarm.
pub struct TestFixture {
    pub keypair: Keypair,
    pub store: Arc<MemoryStore>,
    pub swarm: Arc<MemorySwarm>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_keypair(Keypair::generate(), Arc::new(MemoryStore::new()))
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keypair(keypair(seed), Arc::new(MemoryStore::new()))
    }

    /// Create over an existing store, e.g. one shared with other parties.
    pub fn with_keypair(keypair: Keypair, store: Arc<MemoryStore>) -> Self {
        Self {
            keypair,
            store,
            swarm: Arc::new(MemorySwarm::new()),
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// The store slot of this fixture's identity.
    pub fn target(&self) -> TargetId {
        TargetId::derive(&self.keypair.public_key())
    }

    /// The mutable link for this fixture's identity.
    pub fn link(&self) -> String {
        MagnetLink::for_public_key(&self.keypair.public_key()).to_string()
    }

    /// A client over the fixture's store and swarm with default config.
    pub fn client(&self) -> MutableClient<MemoryStore, MemorySwarm> {
        self.client_with(ClientConfig::default())
    }

    pub fn client_with(&self, config: ClientConfig) -> MutableClient<MemoryStore, MemorySwarm> {
        MutableClient::from_shared(Arc::clone(&self.store), Arc::clone(&self.swarm), config)
    }

    /// Sign a pointer record without going through the client.
    pub fn make_record(&self, seq: u64, info_hash: &InfoHash) -> MutableRecord {
        MutableRecord::pointer(&self.keypair, seq, info_hash)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple parties publishing into one shared store.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let store = Arc::new(MemoryStore::new());
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_keypair(keypair(seed), Arc::clone(&store))
        })
        .collect()
}

/// An info-hash filled with `byte`.
pub fn info_hash(byte: u8) -> InfoHash {
    InfoHash::from_bytes([byte; 20])
}

/// A random info-hash.
pub fn random_info_hash() -> InfoHash {
    InfoHash::from_bytes(rand::random())
}

fn keypair(seed: [u8; 32]) -> Keypair {
    Keypair::from_seed(&seed).expect("32-byte seed")
}
