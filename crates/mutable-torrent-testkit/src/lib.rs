//! # Mutable Torrent Testkit
//!
//! Testing utilities for mutable torrents.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known seeds with expected keys, targets and signatures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up publisher/reader scenarios
//! - **Doubles**: Stores and swarms that fail on demand
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the BEP44 signing rules to known outputs:
//!
//! ```rust
//! use mutable_torrent_testkit::vectors::{all_vectors, record_from_vector};
//!
//! for vector in all_vectors() {
//!     let record = record_from_vector(&vector);
//!     assert_eq!(record.signature.to_hex(), vector.signature);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use mutable_torrent_testkit::generators::{keypair, info_hash};
//!
//! proptest! {
//!     #[test]
//!     fn pointer_round_trips(kp in keypair(), ih in info_hash()) {
//!         let record = MutableRecord::pointer(&kp, 0, &ih);
//!         prop_assert_eq!(record.info_hash().unwrap(), ih);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use mutable_torrent_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let client = fixture.client();
//! assert!(fixture.link().starts_with("magnet:?xs=urn:btpk:"));
//! ```

pub mod doubles;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use doubles::{FlakyStore, RejectingSwarm};
pub use fixtures::{info_hash, multi_party_fixtures, TestFixture};
pub use generators::PublishParams;
pub use vectors::{all_vectors, record_from_vector, verify_all_vectors, GoldenVector};
