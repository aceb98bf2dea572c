//! Cryptographic primitives for mutable torrents.
//!
//! Wraps Ed25519 signing with strong types. Keys travel as hex strings:
//! 32 bytes for the public key, 64 bytes (seed followed by public key) for
//! the secret key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Length of a keypair seed in bytes.
pub const SEED_LEN: usize = 32;

/// Length of an encoded secret key in bytes (seed || public key).
pub const SECRET_KEY_LEN: usize = 64;

/// Record-acceptance predicate: `verify(signature, message, public_key)`.
///
/// Stores and resolvers take this as a plain function pointer so that callers
/// can swap in a different primitive without touching the protocol code.
pub type VerifyFn = fn(&Ed25519Signature, &[u8], &Ed25519PublicKey) -> bool;

/// The default [`VerifyFn`], backed by ed25519-dalek.
pub fn ed25519_verify(
    signature: &Ed25519Signature,
    message: &[u8],
    public_key: &Ed25519PublicKey,
) -> bool {
    public_key.verify(message, signature).is_ok()
}

/// A 32-byte Ed25519 public key. This is the shareable identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;
        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 128-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; 64];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// The zero signature (invalid, used as placeholder).
    pub const ZERO: Self = Self([0u8; 64]);
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Ed25519Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Ed25519Signature {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 64] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// An identity keypair.
///
/// The secret half never leaves this struct except through
/// [`Keypair::secret_key_hex`], which the owning application calls explicitly.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CoreError> {
        let seed: &[u8; SEED_LEN] = seed
            .try_into()
            .map_err(|_| CoreError::InvalidSeed { len: seed.len() })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(seed),
        })
    }

    /// Seeded when a seed is given, random otherwise.
    pub fn create(seed: Option<&[u8]>) -> Result<Self, CoreError> {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Ok(Self::generate()),
        }
    }

    /// Parse a secret key previously produced by [`Keypair::secret_key_hex`].
    ///
    /// Rejects a secret whose public half does not match its seed.
    pub fn from_secret_hex(s: &str) -> Result<Self, CoreError> {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CoreError::InvalidSecretKey(e.to_string()))?;
        let signing_key = SigningKey::from_keypair_bytes(&bytes)
            .map_err(|e| CoreError::InvalidSecretKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The public key as hex.
    pub fn public_key_hex(&self) -> String {
        self.public_key().to_hex()
    }

    /// The secret key as hex (seed || public key).
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_keypair_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; SEED_LEN] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}
