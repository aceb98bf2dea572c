//! Canonical bencode encoding for signed mutable records.
//!
//! The DHT signs and stores bencoded data:
//! - integers as `i<decimal>e`
//! - byte strings as `<len>:<bytes>`
//! - lists as `l<items>e`
//! - dictionaries as `d<key><value>...e` with keys in raw byte order
//!
//! The signed message of a mutable record is the body of the bencoded
//! dictionary `{seq, v}` without its outer `d`/`e`:
//! `3:seqi<seq>e1:v<bencode(v)>`.

use crate::value::Value;

/// Encode a value to bencode.
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Length of the bencoded value without allocating the encoding twice.
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Integer(i) => 2 + i.to_string().len(),
        Value::Bytes(b) => b.len().to_string().len() + 1 + b.len(),
        Value::List(items) => 2 + items.iter().map(encoded_len).sum::<usize>(),
        Value::Dict(entries) => {
            2 + entries
                .iter()
                .map(|(k, v)| k.len().to_string().len() + 1 + k.len() + encoded_len(v))
                .sum::<usize>()
        }
    }
}

/// The message a publisher signs for `(seq, value)`.
pub fn signable_bytes(seq: u64, value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + encoded_len(value));
    buf.extend_from_slice(b"3:seq");
    buf.push(b'i');
    buf.extend_from_slice(seq.to_string().as_bytes());
    buf.push(b'e');
    buf.extend_from_slice(b"1:v");
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            buf.push(b'i');
            buf.extend_from_slice(i.to_string().as_bytes());
            buf.push(b'e');
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::List(items) => {
            buf.push(b'l');
            for item in items {
                encode_value_to(buf, item);
            }
            buf.push(b'e');
        }
        Value::Dict(entries) => {
            // BTreeMap iterates keys in raw byte order already.
            buf.push(b'd');
            for (key, item) in entries {
                encode_bytes(buf, key);
                encode_value_to(buf, item);
            }
            buf.push(b'e');
        }
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InfoHash;
    use bytes::Bytes;
    use std::collections::BTreeMap;

    #[test]
    fn test_bep44_signable_vector() {
        let value = Value::bytes(&b"Hello World!"[..]);
        assert_eq!(signable_bytes(1, &value), b"3:seqi1e1:v12:Hello World!".to_vec());
    }

    #[test]
    fn test_pointer_encoding() {
        let value = Value::pointer(&InfoHash::from_bytes([0xab; 20]));
        let mut expected = b"d2:ih20:".to_vec();
        expected.extend_from_slice(&[0xab; 20]);
        expected.push(b'e');
        assert_eq!(encode_value(&value), expected);
    }

    #[test]
    fn test_dict_keys_sorted() {
        let mut dict = BTreeMap::new();
        dict.insert(Bytes::from_static(b"zz"), Value::Integer(1));
        dict.insert(Bytes::from_static(b"a"), Value::Integer(-2));
        let encoded = encode_value(&Value::Dict(dict));
        assert_eq!(encoded, b"d1:ai-2e2:zzi1ee".to_vec());
    }

    #[test]
    fn test_nested_list() {
        let value = Value::List(vec![
            Value::Integer(0),
            Value::bytes(&b"spam"[..]),
            Value::List(vec![]),
        ]);
        assert_eq!(encode_value(&value), b"li0e4:spamlee".to_vec());
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        let mut dict = BTreeMap::new();
        dict.insert(Bytes::from_static(b"ih"), Value::bytes(vec![7u8; 20]));
        dict.insert(
            Bytes::from_static(b"list"),
            Value::List(vec![Value::Integer(-12345), Value::bytes(vec![1u8; 150])]),
        );
        let value = Value::Dict(dict);
        assert_eq!(encoded_len(&value), encode_value(&value).len());
    }
}
