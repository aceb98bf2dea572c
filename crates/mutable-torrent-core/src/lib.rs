//! # Mutable Torrent Core
//!
//! Pure primitives for mutable torrents: identities, DHT targets, signed
//! pointer records and magnet links.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Keypair`] - An Ed25519 identity, seeded or random
//! - [`TargetId`] - SHA-1 of a public key; the DHT slot of an identity
//! - [`MutableRecord`] - A signed `(seq, value)` pointer
//! - [`InfoHash`] - The content a pointer resolves to
//! - [`MagnetLink`] - `magnet:?` links with `urn:btpk:` identities
//!
//! ## Canonicalization
//!
//! Records are signed over their bencoded `(seq, v)` body. See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod link;
pub mod record;
pub mod types;
pub mod value;

pub use canonical::{encode_value, encoded_len, signable_bytes};
pub use crypto::{ed25519_verify, Ed25519PublicKey, Ed25519Signature, Keypair, VerifyFn};
pub use error::CoreError;
pub use link::{MagnetLink, BTIH_PREFIX, BTPK_PREFIX};
pub use record::{MutableRecord, MAX_VALUE_LEN};
pub use types::{InfoHash, TargetId};
pub use value::Value;
