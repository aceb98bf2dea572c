//! Acceptance policy for incoming records.
//!
//! This is the check a DHT node applies before storing a mutable record:
//! size limit, signature, then sequence ordering against what it holds.

use std::fmt;

use mutable_torrent_core::{ed25519_verify, MutableRecord, VerifyFn, MAX_VALUE_LEN};
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::traits::PutOutcome;

/// Configuration for record acceptance.
#[derive(Clone, Copy)]
pub struct AcceptPolicy {
    /// Signature check applied to every offered record.
    /// Defaults to [`ed25519_verify`].
    pub verify: VerifyFn,
    /// Largest bencoded value accepted.
    pub max_value_len: usize,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            verify: ed25519_verify,
            max_value_len: MAX_VALUE_LEN,
        }
    }
}

impl fmt::Debug for AcceptPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptPolicy")
            .field("verify", &(self.verify as usize as *const ()))
            .field("max_value_len", &self.max_value_len)
            .finish()
    }
}

impl AcceptPolicy {
    /// Decide whether `offered` may replace `existing`.
    ///
    /// - lower sequence than held: `SequenceTooLow`
    /// - same sequence, different record: `SequenceConflict`
    /// - same record: `Refreshed`
    /// - otherwise: `Stored`
    pub fn check(
        &self,
        existing: Option<&MutableRecord>,
        offered: &MutableRecord,
    ) -> Result<PutOutcome> {
        let len = offered.value_len();
        if len > self.max_value_len {
            return Err(StoreError::ValueTooLarge {
                len,
                max: self.max_value_len,
            });
        }

        if !offered.verify_with(self.verify) {
            warn!(
                target_id = %offered.target(),
                seq = offered.seq,
                "rejecting record with bad signature"
            );
            return Err(StoreError::InvalidSignature {
                target: offered.target().to_hex(),
            });
        }

        let Some(existing) = existing else {
            return Ok(PutOutcome::Stored);
        };

        if offered.seq < existing.seq {
            return Err(StoreError::SequenceTooLow {
                current: existing.seq,
                offered: offered.seq,
            });
        }

        if offered.seq == existing.seq {
            if offered == existing {
                return Ok(PutOutcome::Refreshed);
            }
            return Err(StoreError::SequenceConflict { seq: offered.seq });
        }

        Ok(PutOutcome::Stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutable_torrent_core::{Ed25519PublicKey, Ed25519Signature, InfoHash, Keypair, Value};
    use proptest::prelude::*;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x07; 32]).unwrap()
    }

    fn record(seq: u64, fill: u8) -> MutableRecord {
        MutableRecord::pointer(&keypair(), seq, &InfoHash::from_bytes([fill; 20]))
    }

    #[test]
    fn test_first_record_stored() {
        let policy = AcceptPolicy::default();
        assert_eq!(policy.check(None, &record(0, 1)).unwrap(), PutOutcome::Stored);
    }

    #[test]
    fn test_higher_sequence_stored() {
        let policy = AcceptPolicy::default();
        let held = record(1, 1);
        assert_eq!(policy.check(Some(&held), &record(2, 2)).unwrap(), PutOutcome::Stored);
    }

    #[test]
    fn test_identical_record_refreshed() {
        let policy = AcceptPolicy::default();
        let held = record(5, 1);
        assert_eq!(
            policy.check(Some(&held), &held.clone()).unwrap(),
            PutOutcome::Refreshed
        );
    }

    #[test]
    fn test_lower_sequence_rejected() {
        let policy = AcceptPolicy::default();
        let held = record(5, 1);
        let err = policy.check(Some(&held), &record(4, 2)).unwrap_err();
        assert!(matches!(err, StoreError::SequenceTooLow { current: 5, offered: 4 }));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_same_sequence_different_value_conflicts() {
        let policy = AcceptPolicy::default();
        let held = record(5, 1);
        let err = policy.check(Some(&held), &record(5, 2)).unwrap_err();
        assert!(matches!(err, StoreError::SequenceConflict { seq: 5 }));
    }

    #[test]
    fn test_bad_signature_rejected() {
        let policy = AcceptPolicy::default();
        let mut forged = record(9, 1);
        forged.signature = Ed25519Signature::ZERO;
        assert!(matches!(
            policy.check(None, &forged),
            Err(StoreError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_custom_verify_hook() {
        fn accept_all(_: &Ed25519Signature, _: &[u8], _: &Ed25519PublicKey) -> bool {
            true
        }
        let policy = AcceptPolicy {
            verify: accept_all,
            ..AcceptPolicy::default()
        };
        let mut forged = record(9, 1);
        forged.signature = Ed25519Signature::ZERO;
        assert_eq!(policy.check(None, &forged).unwrap(), PutOutcome::Stored);
    }

    #[test]
    fn test_oversized_value_rejected() {
        let policy = AcceptPolicy::default();
        let big = MutableRecord::sign(&keypair(), 0, Value::bytes(vec![0u8; 2000]));
        assert!(matches!(
            policy.check(None, &big),
            Err(StoreError::ValueTooLarge { .. })
        ));
    }

    proptest! {
        #[test]
        fn accepted_sequence_never_decreases(held in 0u64..1000, offered in 0u64..1000) {
            let policy = AcceptPolicy::default();
            let existing = record(held, 1);
            let result = policy.check(Some(&existing), &record(offered, 2));
            prop_assert_eq!(result.is_ok(), offered > held);
        }
    }
}
