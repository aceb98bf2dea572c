//! Mutable record: the signed pointer stored in the DHT.
//!
//! A record binds `(seq, value)` to a public key with a signature over
//! [`signable_bytes`]. The store keys it by [`TargetId::derive`] of that key.

use crate::canonical::{encoded_len, signable_bytes};
use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, VerifyFn};
use crate::error::CoreError;
use crate::types::{InfoHash, TargetId};
use crate::value::{Value, INFO_HASH_KEY};

/// Largest bencoded value the DHT accepts, in bytes.
pub const MAX_VALUE_LEN: usize = 1000;

/// A signed mutable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableRecord {
    /// The identity that signed the record.
    pub public_key: Ed25519PublicKey,
    /// Sequence number; higher wins.
    pub seq: u64,
    /// The signed value.
    pub value: Value,
    /// Signature over `signable_bytes(seq, value)`.
    pub signature: Ed25519Signature,
}

impl MutableRecord {
    /// Build and sign a record.
    pub fn sign(keypair: &Keypair, seq: u64, value: Value) -> Self {
        let signature = keypair.sign(&signable_bytes(seq, &value));
        Self {
            public_key: keypair.public_key(),
            seq,
            value,
            signature,
        }
    }

    /// Build and sign a pointer record for an info-hash.
    pub fn pointer(keypair: &Keypair, seq: u64, info_hash: &InfoHash) -> Self {
        Self::sign(keypair, seq, Value::pointer(info_hash))
    }

    /// The store slot for this record.
    pub fn target(&self) -> TargetId {
        TargetId::derive(&self.public_key)
    }

    /// The signed message.
    pub fn signable(&self) -> Vec<u8> {
        signable_bytes(self.seq, &self.value)
    }

    /// Check the signature with the given hook.
    pub fn verify_with(&self, verify: VerifyFn) -> bool {
        verify(&self.signature, &self.signable(), &self.public_key)
    }

    /// Size of the bencoded value.
    pub fn value_len(&self) -> usize {
        encoded_len(&self.value)
    }

    /// Reject values above `max` bytes.
    pub fn check_value_len(&self, max: usize) -> Result<(), CoreError> {
        let len = self.value_len();
        if len > max {
            return Err(CoreError::ValueTooLarge { len, max });
        }
        Ok(())
    }

    /// Extract the info-hash from a pointer value.
    ///
    /// Fails with `MalformedRecord` unless the value is a dictionary whose
    /// `ih` entry is a 20-byte string.
    pub fn info_hash(&self) -> Result<InfoHash, CoreError> {
        if self.value.as_dict().is_none() {
            return Err(CoreError::MalformedRecord(format!(
                "value is a {}, expected a dictionary",
                self.value.kind()
            )));
        }

        let field = self
            .value
            .get(INFO_HASH_KEY)
            .ok_or_else(|| CoreError::MalformedRecord("value has no `ih` field".into()))?;

        let bytes = field.as_bytes().ok_or_else(|| {
            CoreError::MalformedRecord(format!("`ih` is a {}, expected a byte string", field.kind()))
        })?;

        InfoHash::try_from(bytes).map_err(|_| {
            CoreError::MalformedRecord(format!("`ih` is {} bytes, expected 20", bytes.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ed25519_verify;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x42; 32]).unwrap()
    }

    #[test]
    fn test_pointer_record_roundtrip() {
        let ih = InfoHash::from_bytes([0xab; 20]);
        let record = MutableRecord::pointer(&keypair(), 0, &ih);

        assert_eq!(record.info_hash().unwrap(), ih);
        assert!(record.verify_with(ed25519_verify));
        assert_eq!(record.target(), TargetId::derive(&keypair().public_key()));
    }

    #[test]
    fn test_known_signature() {
        let record = MutableRecord::pointer(&keypair(), 0, &InfoHash::from_bytes([0xab; 20]));
        assert_eq!(
            record.signature.to_hex(),
            "6abf248fb1b3c54364ac048bd3601b8761006f5870649d547bd48630a62c419d\
             46bb90f1bb19ca62a69d6af01966403162614144f56d7182f36d1e9ab1a1b20b"
        );
    }

    #[test]
    fn test_tampered_seq_fails_verification() {
        let mut record = MutableRecord::pointer(&keypair(), 3, &InfoHash::from_bytes([1; 20]));
        record.seq = 4;
        assert!(!record.verify_with(ed25519_verify));
    }

    #[test]
    fn test_missing_ih_is_malformed() {
        let record = MutableRecord::sign(&keypair(), 0, Value::Dict(Default::default()));
        assert!(matches!(record.info_hash(), Err(CoreError::MalformedRecord(_))));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let record = MutableRecord::sign(&keypair(), 0, Value::bytes(vec![0u8; 20]));
        assert!(matches!(record.info_hash(), Err(CoreError::MalformedRecord(_))));

        let mut dict = std::collections::BTreeMap::new();
        dict.insert(bytes::Bytes::from_static(b"ih"), Value::Integer(5));
        let record = MutableRecord::sign(&keypair(), 0, Value::Dict(dict));
        assert!(matches!(record.info_hash(), Err(CoreError::MalformedRecord(_))));
    }

    #[test]
    fn test_short_ih_is_malformed() {
        let mut dict = std::collections::BTreeMap::new();
        dict.insert(bytes::Bytes::from_static(b"ih"), Value::bytes(vec![0u8; 19]));
        let record = MutableRecord::sign(&keypair(), 0, Value::Dict(dict));
        assert!(matches!(record.info_hash(), Err(CoreError::MalformedRecord(_))));
    }

    #[test]
    fn test_value_len_limit() {
        let record = MutableRecord::sign(&keypair(), 0, Value::bytes(vec![0u8; 1200]));
        assert!(matches!(
            record.check_value_len(MAX_VALUE_LEN),
            Err(CoreError::ValueTooLarge { max: MAX_VALUE_LEN, .. })
        ));

        let small = MutableRecord::pointer(&keypair(), 0, &InfoHash::from_bytes([0; 20]));
        small.check_value_len(MAX_VALUE_LEN).unwrap();
    }
}
