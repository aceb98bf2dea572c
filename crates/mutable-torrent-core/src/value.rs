//! The value carried by a mutable record.
//!
//! Values follow the bencode data model (integers, byte strings, lists and
//! dictionaries keyed by byte strings) because that is what the DHT signs
//! and stores. A pointer value is the dictionary `{"ih": <info-hash>}`.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::InfoHash;

/// Dictionary key holding the info-hash in a pointer value.
pub const INFO_HASH_KEY: &[u8] = b"ih";

/// A bencode-model value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Value>),
    /// Keys are kept sorted, which is also the bencode ordering.
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Build the pointer value `{"ih": info_hash}`.
    pub fn pointer(info_hash: &InfoHash) -> Self {
        let mut dict = BTreeMap::new();
        dict.insert(
            Bytes::from_static(INFO_HASH_KEY),
            Value::Bytes(Bytes::copy_from_slice(info_hash.as_bytes())),
        );
        Value::Dict(dict)
    }

    /// Create a byte-string value.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Value::Bytes(data.into())
    }

    /// Create a dictionary value from `(key, value)` pairs.
    pub fn dict<K: Into<Bytes>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a key if this is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        match self {
            Value::Dict(dict) => dict.get(key),
            _ => None,
        }
    }

    /// The byte string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }
}

impl From<&InfoHash> for Value {
    fn from(info_hash: &InfoHash) -> Self {
        Value::pointer(info_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_value_shape() {
        let ih = InfoHash::from_bytes([0x11; 20]);
        let value = Value::pointer(&ih);

        let dict = value.as_dict().expect("pointer is a dictionary");
        assert_eq!(dict.len(), 1);
        assert_eq!(
            value.get(INFO_HASH_KEY).and_then(Value::as_bytes),
            Some(&[0x11u8; 20][..])
        );
    }

    #[test]
    fn test_get_on_non_dict() {
        assert!(Value::Integer(3).get(b"ih").is_none());
        assert!(Value::bytes(&b"ih"[..]).get(b"ih").is_none());
        assert_eq!(Value::List(vec![]).kind(), "list");
    }
}
