//! The MutableClient: publish, resolve and republish mutable pointers.
//!
//! The client ties a [`RecordStore`] (the DHT) to a [`Swarm`] (the torrent
//! client) and rewrites mutable links on their way into the swarm.

use std::sync::Arc;

use mutable_torrent_core::{
    Ed25519PublicKey, InfoHash, Keypair, MagnetLink, MutableRecord, TargetId,
};
use mutable_torrent_store::{PutOutcome, RecordStore};
use tracing::{debug, warn};

use crate::config::{ClientConfig, PublishOptions};
use crate::error::{ClientError, Result};
use crate::swarm::{JoinOptions, MutableOrigin, Swarm, SwarmHandle};

/// What a mutable identity currently points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPointer {
    /// The content the identity points to.
    pub info_hash: InfoHash,
    /// Sequence of the record it was read from.
    pub sequence: u64,
}

/// The result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// `magnet:?xs=urn:btpk:<public key>`. Names the identity, not the content.
    pub magnet_link: String,
    /// The content published.
    pub info_hash: InfoHash,
    /// The sequence the record was signed with.
    pub sequence: u64,
    /// The store slot written.
    pub target: TargetId,
}

/// The main client.
///
/// Holds the store and swarm behind `Arc`s plus an immutable config, so
/// clones share the same backends.
pub struct MutableClient<S: RecordStore, W: Swarm> {
    store: Arc<S>,
    swarm: Arc<W>,
    config: ClientConfig,
}

impl<S: RecordStore, W: Swarm> Clone for MutableClient<S, W> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            swarm: Arc::clone(&self.swarm),
            config: self.config,
        }
    }
}

impl<S: RecordStore, W: Swarm> MutableClient<S, W> {
    /// Create a new client that owns its store and swarm.
    pub fn new(store: S, swarm: W, config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(swarm), config)
    }

    /// Create a client over backends shared with other clients.
    pub fn from_shared(store: Arc<S>, swarm: Arc<W>, config: ClientConfig) -> Self {
        Self {
            store,
            swarm,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the swarm reference.
    pub fn swarm(&self) -> &W {
        &self.swarm
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a keypair, deterministic when a 32-byte seed is given.
    pub fn create_keypair(seed: Option<&[u8]>) -> Result<Keypair> {
        Ok(Keypair::create(seed)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolve
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a hex public key to the info-hash it currently points to.
    ///
    /// Returns `Ok(None)` when the identity has never been published.
    pub async fn resolve(&self, public_key_hex: &str) -> Result<Option<ResolvedPointer>> {
        let public_key = Ed25519PublicKey::from_hex(public_key_hex)?;
        self.resolve_key(&public_key).await
    }

    /// Resolve an already-decoded public key.
    pub async fn resolve_key(
        &self,
        public_key: &Ed25519PublicKey,
    ) -> Result<Option<ResolvedPointer>> {
        let target = TargetId::derive(public_key);
        debug!(public_key = %public_key, target_id = %target, "resolving");

        let record = match self.store.get(&target).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(target_id = %target, "no record");
                return Ok(None);
            }
            Err(e) => {
                warn!(target_id = %target, error = %e, "fetch failed during resolve");
                return Err(ClientError::ResolutionFailed(e));
            }
        };

        let resolved = self.read_pointer(public_key, &record)?;
        debug!(
            target_id = %target,
            seq = resolved.sequence,
            info_hash = %resolved.info_hash,
            "resolved"
        );
        Ok(Some(resolved))
    }

    fn read_pointer(
        &self,
        public_key: &Ed25519PublicKey,
        record: &MutableRecord,
    ) -> Result<ResolvedPointer> {
        check_owner(public_key, record)?;

        let info_hash = record.info_hash().map_err(|e| {
            warn!(public_key = %public_key, seq = record.seq, error = %e, "malformed record");
            ClientError::from(e)
        })?;

        if self.config.verify_on_resolve && !record.verify_with(self.config.verify) {
            warn!(public_key = %public_key, seq = record.seq, "record signature did not verify");
            return Err(ClientError::InvalidSignature);
        }

        Ok(ResolvedPointer {
            info_hash,
            sequence: record.seq,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publish
    // ─────────────────────────────────────────────────────────────────────────

    /// Point `keypair`'s identity at `info_hash`.
    ///
    /// The next sequence is one past the record currently in the store, or
    /// `options.sequence` (default 0) when there is none. A failed fetch
    /// aborts the publish rather than guessing a sequence.
    pub async fn publish(
        &self,
        keypair: &Keypair,
        info_hash: &InfoHash,
        options: PublishOptions,
    ) -> Result<PublishReceipt> {
        let public_key = keypair.public_key();
        let target = TargetId::derive(&public_key);

        let prior = self.store.get(&target).await.map_err(|e| {
            warn!(target_id = %target, error = %e, "fetch failed during publish");
            ClientError::PublishFailed(e)
        })?;

        let sequence = match &prior {
            Some(record) => record
                .seq
                .checked_add(1)
                .ok_or(ClientError::SequenceExhausted(public_key))?,
            None => options.sequence.unwrap_or(0),
        };
        debug!(
            target_id = %target,
            prior = ?prior.as_ref().map(|r| r.seq),
            seq = sequence,
            "publishing"
        );

        let record = MutableRecord::pointer(keypair, sequence, info_hash);
        let ack = self.store.put(&record).await.map_err(|e| {
            warn!(target_id = %target, seq = sequence, error = %e, "put failed during publish");
            ClientError::PublishFailed(e)
        })?;
        debug!(target_id = %target, seq = sequence, outcome = ?ack.outcome, "published");

        Ok(PublishReceipt {
            magnet_link: MagnetLink::for_public_key(&public_key).to_string(),
            info_hash: *info_hash,
            sequence,
            target,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Republish
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-announce the record currently held for an identity, unchanged.
    ///
    /// Needs no secret key. Callers own the schedule.
    pub async fn republish(&self, public_key_hex: &str) -> Result<()> {
        let public_key = Ed25519PublicKey::from_hex(public_key_hex)?;
        let target = TargetId::derive(&public_key);

        let record = self
            .store
            .get(&target)
            .await
            .map_err(|e| {
                warn!(target_id = %target, error = %e, "fetch failed during republish");
                ClientError::RepublishFailed(e)
            })?
            .ok_or(ClientError::NotPublished(public_key))?;
        check_owner(&public_key, &record)?;

        let ack = self.store.put(&record).await.map_err(|e| {
            warn!(target_id = %target, seq = record.seq, error = %e, "put failed during republish");
            ClientError::RepublishFailed(e)
        })?;

        if ack.outcome == PutOutcome::Stored {
            debug!(target_id = %target, seq = record.seq, "republish restored an empty slot");
        } else {
            debug!(target_id = %target, seq = record.seq, "republished");
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Add by link
    // ─────────────────────────────────────────────────────────────────────────

    /// Join a swarm by link, resolving mutable links first.
    ///
    /// Links without a `urn:btpk:` identity go to the swarm unchanged.
    /// Mutable links get `xt=urn:btih:<resolved>` appended and the returned
    /// handle records which identity and sequence they came from. If the
    /// identity cannot be resolved the swarm is never asked to join.
    pub async fn add_by_link(
        &self,
        link: &str,
        options: JoinOptions,
    ) -> Result<SwarmHandle<W::Handle>> {
        let magnet = match MagnetLink::parse(link) {
            Ok(magnet) if magnet.is_mutable() => magnet,
            _ => {
                debug!(link, "direct join");
                let handle = self.swarm.join(link, &options).await?;
                return Ok(SwarmHandle::direct(handle));
            }
        };

        let public_key = magnet
            .public_key()?
            .ok_or_else(|| ClientError::InvalidPublicKey(link.to_string()))?;

        if self.config.trust_link_hint {
            if let Some(hint) = magnet.info_hash()? {
                debug!(public_key = %public_key, info_hash = %hint, "trusting link hint");
                let rewritten = magnet.with_info_hash(&hint).to_string();
                let handle = self.swarm.join(&rewritten, &options).await?;
                let origin = MutableOrigin {
                    public_key,
                    sequence: None,
                    link: rewritten,
                };
                return Ok(SwarmHandle::mutable(handle, origin));
            }
        }

        debug!(public_key = %public_key, "resolving link");
        let resolved = match self.resolve_key(&public_key).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                warn!(public_key = %public_key, "link names an unpublished identity");
                return Err(ClientError::NotPublished(public_key));
            }
            Err(e) => {
                warn!(public_key = %public_key, error = %e, "link resolution failed");
                return Err(e);
            }
        };

        let rewritten = magnet.with_info_hash(&resolved.info_hash).to_string();
        debug!(
            public_key = %public_key,
            seq = resolved.sequence,
            link = %rewritten,
            "joining resolved link"
        );
        let handle = self.swarm.join(&rewritten, &options).await?;

        Ok(SwarmHandle::mutable(
            handle,
            MutableOrigin {
                public_key,
                sequence: Some(resolved.sequence),
                link: rewritten,
            },
        ))
    }
}

/// A slot must hold a record signed by the identity it was looked up for.
fn check_owner(public_key: &Ed25519PublicKey, record: &MutableRecord) -> Result<()> {
    if record.public_key != *public_key {
        warn!(
            expected = %public_key,
            found = %record.public_key,
            "record carries a different public key"
        );
        return Err(ClientError::MalformedRecord(format!(
            "record is for {}, requested {}",
            record.public_key, public_key
        )));
    }
    Ok(())
}
