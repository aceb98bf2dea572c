//! Strong type definitions for mutable torrents.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

use crate::crypto::Ed25519PublicKey;

/// A 20-byte DHT target, computed as SHA-1(public_key).
///
/// This is the store slot for an identity. It is recomputed on every
/// operation and never stored on its own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub [u8; 20]);

impl TargetId {
    /// Derive the target for a public key.
    pub fn derive(public_key: &Ed25519PublicKey) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(public_key.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for TargetId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for TargetId {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 20] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// A 20-byte BitTorrent v1 info-hash: the content a mutable link points to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoHash(pub [u8; 20]);

impl InfoHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; 20];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for InfoHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for InfoHash {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for InfoHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 20] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_is_sha1_of_public_key() {
        // BEP44 test vector 1.
        let pk = Ed25519PublicKey::from_hex(
            "77ff84905a91936367c01360803104f92432fcd904a43511876df5cdf3e7e548",
        )
        .unwrap();
        assert_eq!(
            TargetId::derive(&pk).to_hex(),
            "4a533d47ec9c7d95b1ad75f576cffc641853b750"
        );
    }

    #[test]
    fn test_target_id_deterministic() {
        let pk = Ed25519PublicKey::from_bytes([0x42; 32]);
        assert_eq!(TargetId::derive(&pk), TargetId::derive(&pk));
        assert_ne!(
            TargetId::derive(&pk),
            TargetId::derive(&Ed25519PublicKey::from_bytes([0x43; 32]))
        );
    }

    #[test]
    fn test_info_hash_hex_roundtrip() {
        let ih = InfoHash::from_bytes([0xab; 20]);
        let recovered = InfoHash::from_hex(&ih.to_hex()).unwrap();
        assert_eq!(ih, recovered);
        assert_eq!(format!("{}", ih), "ab".repeat(20));
    }

    #[test]
    fn test_info_hash_rejects_wrong_length() {
        assert!(InfoHash::from_hex("abcd").is_err());
        assert!(InfoHash::try_from(&[0u8; 19][..]).is_err());
    }

    #[test]
    fn test_target_id_debug() {
        let id = TargetId::from_bytes([0xcd; 20]);
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("TargetId("));
    }
}
