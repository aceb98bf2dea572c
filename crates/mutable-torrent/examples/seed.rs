//! Publish a pointer under a fixed identity and keep it alive.
//!
//! ```text
//! cargo run --example seed -- [info-hash hex]
//! ```
//!
//! Records go to the SQLite file named by `MUTABLE_TORRENT_DB` (a file in the
//! temp directory by default), so the `download` example can resolve them.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use mutable_torrent::store::SqliteStore;
use mutable_torrent::swarm::memory::MemorySwarm;
use mutable_torrent::{ClientConfig, InfoHash, MutableClient, PublishOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SEED: &str = "DEADBEEFDEADBEEFDEADBEEFDEADBEEFDEADBEEFDEADBEEFDEADBEEFDEADBEEF";

const REPUBLISH_INTERVAL: Duration = Duration::from_secs(10 * 60);

fn db_path() -> PathBuf {
    std::env::var_os("MUTABLE_TORRENT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("mutable-torrent-demo.db"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mutable_torrent=debug")),
        )
        .init();

    let info_hash = match std::env::args().nth(1) {
        Some(hex) => InfoHash::from_hex(&hex).context("info-hash must be 40 hex characters")?,
        None => InfoHash::from_bytes([0xab; 20]),
    };

    let path = db_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening record store at {}", path.display()))?;
    let client = MutableClient::new(store, MemorySwarm::new(), ClientConfig::default());

    let seed = hex::decode(SEED)?;
    let keypair =
        MutableClient::<SqliteStore, MemorySwarm>::create_keypair(Some(seed.as_slice()))?;
    info!(
        public_key = %keypair.public_key_hex(),
        secret_key = %keypair.secret_key_hex(),
        "created keypair"
    );

    let receipt = client
        .publish(&keypair, &info_hash, PublishOptions::default())
        .await?;
    info!(link = %receipt.magnet_link, version = receipt.sequence, "published torrent");

    let resolved = client
        .resolve(&keypair.public_key_hex())
        .await?
        .context("record vanished right after publishing")?;
    info!(
        info_hash = %resolved.info_hash,
        version = resolved.sequence,
        "resolved latest version"
    );

    info!("seeding...");
    let mut ticker = tokio::time::interval(REPUBLISH_INTERVAL);
    loop {
        ticker.tick().await;
        info!("republishing");
        if let Err(e) = client.republish(&keypair.public_key_hex()).await {
            warn!(error = %e, "republish failed, retrying next interval");
        }
        info!(
            minutes = REPUBLISH_INTERVAL.as_secs() / 60,
            "scheduled next republish"
        );
    }
}
