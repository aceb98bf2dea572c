//! Join a swarm by link, resolving mutable links first.
//!
//! ```text
//! cargo run --example download -- 'magnet:?xs=urn:btpk:<public key>'
//! ```
//!
//! Resolves against the same SQLite file the `seed` example publishes into.

use std::path::PathBuf;

use anyhow::Context;
use mutable_torrent::store::SqliteStore;
use mutable_torrent::swarm::memory::MemorySwarm;
use mutable_torrent::{ClientConfig, JoinOptions, MutableClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

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

    let link = std::env::args()
        .nth(1)
        .context("usage: download <magnet link>")?;

    let path = db_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening record store at {}", path.display()))?;
    let client = MutableClient::new(store, MemorySwarm::new(), ClientConfig::default());

    let download_location = std::env::current_dir()?.join("download");
    let torrent = client
        .add_by_link(&link, JoinOptions::with_path(download_location))
        .await?;

    match torrent.info_hash {
        Some(info_hash) => info!(%info_hash, version = ?torrent.sequence(), "downloading torrent"),
        None => info!(link = %torrent.link, "downloading torrent"),
    }
    Ok(())
}
