//! Proptest generators for property-based testing.

use proptest::prelude::*;

use mutable_torrent_core::{Ed25519PublicKey, InfoHash, Keypair, MutableRecord, Value};

/// Generate a 32-byte seed.
pub fn seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    seed().prop_map(|seed| Keypair::from_seed(&seed).expect("32-byte seed"))
}

/// Generate a random Ed25519PublicKey.
pub fn public_key() -> impl Strategy<Value = Ed25519PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a random InfoHash.
pub fn info_hash() -> impl Strategy<Value = InfoHash> {
    any::<[u8; 20]>().prop_map(InfoHash::from_bytes)
}

/// Generate a sequence number with room for a few increments.
pub fn seq() -> impl Strategy<Value = u64> {
    0u64..=u64::MAX - 16
}

/// Generate an arbitrary bencode-model value, a few levels deep.
pub fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::bytes),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec((prop::collection::vec(any::<u8>(), 0..8), inner), 0..4)
                .prop_map(|entries| Value::dict(entries)),
        ]
    })
}

/// Parameters for a sequence of publications by one identity.
#[derive(Debug, Clone)]
pub struct PublishParams {
    pub keypair: Keypair,
    /// Sequence requested for the first publish.
    pub first_seq: Option<u64>,
    /// Contents published, in order.
    pub contents: Vec<InfoHash>,
}

impl Arbitrary for PublishParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keypair(),
            prop::option::of(0u64..=1_000_000u64),
            prop::collection::vec(info_hash(), 1..6),
        )
            .prop_map(|(keypair, first_seq, contents)| PublishParams {
                keypair,
                first_seq,
                contents,
            })
            .boxed()
    }
}

/// Sign a pointer record for every content in `params`, with consecutive
/// sequence numbers.
pub fn records_from_params(params: &PublishParams) -> Vec<MutableRecord> {
    let start = params.first_seq.unwrap_or(0);
    params
        .contents
        .iter()
        .enumerate()
        .map(|(i, ih)| MutableRecord::pointer(&params.keypair, start + i as u64, ih))
        .collect()
}
