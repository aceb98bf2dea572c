//! Golden test vectors for deterministic verification.
//!
//! Each vector fixes a seed, sequence and info-hash and records the public
//! key, DHT target and signature every implementation must produce. Ed25519
//! signatures are deterministic, so these are exact.

use serde::Serialize;

use mutable_torrent_core::{
    Ed25519PublicKey, Ed25519Signature, InfoHash, Keypair, MutableRecord, Value,
};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation (32 bytes hex).
    pub seed: &'static str,
    pub seq: u64,
    /// Info-hash the record points to (20 bytes hex).
    pub info_hash: &'static str,
    /// Expected public key (32 bytes hex).
    pub public_key: &'static str,
    /// Expected DHT target (20 bytes hex).
    pub target: &'static str,
    /// Expected signature (64 bytes hex).
    pub signature: &'static str,
}

const IH_AB: &str = "abababababababababababababababababababab";

const SEED_42: &str = "4242424242424242424242424242424242424242424242424242424242424242";
const PK_42: &str = "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12";
const TARGET_42: &str = "9f80be4f7f2a4fe7c1d0b9aad24309d7444dcfec";

const SEED_DEADBEEF: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";
const PK_DEADBEEF: &str = "ff57575dc7af8bfc4d0837cc1ce2017b686a88145dc5579a958e3462fe9a908e";
const TARGET_DEADBEEF: &str = "a4a08da1b867cd08a9c2139709ce57cf2884e453";

const SEED_ZERO: &str = "0000000000000000000000000000000000000000000000000000000000000000";
const PK_ZERO: &str = "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29";
const TARGET_ZERO: &str = "8c30c97e7fd5460ce3b962db4cd75879eecd8abd";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "first publish, seed 0x42",
            seed: SEED_42,
            seq: 0,
            info_hash: IH_AB,
            public_key: PK_42,
            target: TARGET_42,
            signature: "6abf248fb1b3c54364ac048bd3601b8761006f5870649d547bd48630a62c419d\
                        46bb90f1bb19ca62a69d6af01966403162614144f56d7182f36d1e9ab1a1b20b",
        },
        GoldenVector {
            name: "second publish, seed 0x42",
            seed: SEED_42,
            seq: 1,
            info_hash: IH_AB,
            public_key: PK_42,
            target: TARGET_42,
            signature: "de39a7e11e95b70234f302c22dae87ea5b46a21854d9a0eea3f316afec6fc170\
                        de2d9aab0189e2e07b6f47c43f97859f04a10197e0f64e8d83d7e81c554e5606",
        },
        GoldenVector {
            name: "first publish, demo seed",
            seed: SEED_DEADBEEF,
            seq: 0,
            info_hash: IH_AB,
            public_key: PK_DEADBEEF,
            target: TARGET_DEADBEEF,
            signature: "d576e3f764db03520481d632dd14cad773c836c33d82cddd7ff4a3ebb781de0f\
                        5f27df80f62c597b2937d7883f2e7f7d262173d7e29772543e9d7591320f4a0d",
        },
        GoldenVector {
            name: "second publish, demo seed",
            seed: SEED_DEADBEEF,
            seq: 1,
            info_hash: IH_AB,
            public_key: PK_DEADBEEF,
            target: TARGET_DEADBEEF,
            signature: "2c299935ae792a89eb231870d24bdddce8adccbc328ed96191ebb348f427970b\
                        78fdec1d130b583062b1921b137676c56bac2eef3fd8fdf9797b890de7bfe60b",
        },
        GoldenVector {
            name: "first publish, zero seed",
            seed: SEED_ZERO,
            seq: 0,
            info_hash: IH_AB,
            public_key: PK_ZERO,
            target: TARGET_ZERO,
            signature: "edba348d82e4b4b07a4859d002ba81adfb607c0e7f2b8fb7521dc9b7821f15e7\
                        ff152f67f6371547462c876345e76cd38133bfb699a9214d4d270a077d9f750d",
        },
        GoldenVector {
            name: "second publish, zero seed",
            seed: SEED_ZERO,
            seq: 1,
            info_hash: IH_AB,
            public_key: PK_ZERO,
            target: TARGET_ZERO,
            signature: "01edc64f57729f18c5ed8307cab390f11d880d1ea332feb289cb566c0412cfa7\
                        9b6cf1a62a34180289f9cfdc8b85a7b083a9ea62eaf89c9d0dc54d864164e109",
        },
    ]
}

/// Sign the pointer record a golden vector describes.
pub fn record_from_vector(vector: &GoldenVector) -> MutableRecord {
    let seed = hex::decode(vector.seed).expect("vector seed is hex");
    let keypair = Keypair::from_seed(&seed).expect("vector seed is 32 bytes");
    let info_hash = InfoHash::from_hex(vector.info_hash).expect("vector info-hash is hex");
    MutableRecord::pointer(&keypair, vector.seq, &info_hash)
}

/// Check every vector against this implementation.
///
/// Returns `(name, matches, produced signature)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let record = record_from_vector(v);
            let signature = record.signature.to_hex();
            let matches = record.public_key.to_hex() == v.public_key
                && record.target().to_hex() == v.target
                && signature == v.signature;
            (v.name.to_string(), matches, signature)
        })
        .collect()
}

/// The mutable-item example published with BEP44: `"Hello World!"` at seq 1.
///
/// Returns the record and its expected DHT target.
pub fn bep44_example() -> (MutableRecord, &'static str) {
    let public_key = Ed25519PublicKey::from_hex(
        "77ff84905a91936367c01360803104f92432fcd904a43511876df5cdf3e7e548",
    )
    .expect("valid key");
    let signature = Ed25519Signature::from_hex(
        "305ac8aeb6c9c151fa120f120ea2cfb923564e11552d06a5d856091e5e853cff\
         1260d3f39e4999684aa92eb73ffd136e6f4f3ecbfda0ce53a1608ecd7ae21f01",
    )
    .expect("valid signature");

    let record = MutableRecord {
        public_key,
        seq: 1,
        value: Value::bytes(&b"Hello World!"[..]),
        signature,
    };
    (record, "4a533d47ec9c7d95b1ad75f576cffc641853b750")
}
