//! Multi-party and failure scenarios built from the testkit fixtures.

use std::sync::Arc;
use std::time::Duration;

use mutable_torrent::store::{MemoryStore, SqliteStore, StoreError};
use mutable_torrent::swarm::memory::MemorySwarm;
use mutable_torrent::{ClientConfig, ClientError, JoinOptions, MutableClient, PublishOptions};
use mutable_torrent_testkit::{
    info_hash, multi_party_fixtures, FlakyStore, RejectingSwarm, TestFixture,
};

#[tokio::test]
async fn test_failed_fetch_never_writes() {
    let fixture = TestFixture::with_seed([0x42; 32]);
    let store = Arc::new(FlakyStore::new(MemoryStore::new()));
    let client = MutableClient::from_shared(
        Arc::clone(&store),
        Arc::new(MemorySwarm::new()),
        ClientConfig::default(),
    );

    store.fail_gets(true);
    let err = client
        .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::PublishFailed(StoreError::Unavailable(_))));
    assert_eq!(store.gets(), vec![fixture.target()]);
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn test_resolve_queries_store_every_time() {
    let fixture = TestFixture::with_seed([0x42; 32]);
    let store = Arc::new(FlakyStore::new(MemoryStore::new()));
    let client = MutableClient::from_shared(
        Arc::clone(&store),
        Arc::new(MemorySwarm::new()),
        ClientConfig::default(),
    );
    client
        .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
        .await
        .unwrap();

    for _ in 0..3 {
        client.resolve(&fixture.public_key_hex()).await.unwrap();
    }
    // One read for the publish, one per resolve.
    assert_eq!(store.gets().len(), 4);
}

#[tokio::test]
async fn test_republish_writes_identical_record() {
    let fixture = TestFixture::with_seed([0x42; 32]);
    let store = Arc::new(FlakyStore::new(MemoryStore::new()));
    let client = MutableClient::from_shared(
        Arc::clone(&store),
        Arc::new(MemorySwarm::new()),
        ClientConfig::default(),
    );
    client
        .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
        .await
        .unwrap();
    client.republish(&fixture.public_key_hex()).await.unwrap();

    let puts = store.puts();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0], puts[1]);
}

#[tokio::test]
async fn test_republish_loop_outlives_store_outage() {
    let fixture = TestFixture::with_seed([0x42; 32]);
    let store = Arc::new(FlakyStore::new(MemoryStore::new()));
    let client = MutableClient::from_shared(
        Arc::clone(&store),
        Arc::new(MemorySwarm::new()),
        ClientConfig::default(),
    );
    client
        .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
        .await
        .unwrap();

    // Same shape as the seed demo: a failed round is logged, not fatal.
    let mut ticker = tokio::time::interval(Duration::from_millis(1));
    let mut outcomes = Vec::new();
    for round in 0..4 {
        ticker.tick().await;
        store.fail_gets(round == 1 || round == 2);
        match client.republish(&fixture.public_key_hex()).await {
            Ok(()) => outcomes.push(true),
            Err(e) => {
                assert!(matches!(e, ClientError::RepublishFailed(StoreError::Unavailable(_))));
                outcomes.push(false);
            }
        }
    }

    assert_eq!(outcomes, vec![true, false, false, true]);
    // Initial publish plus the two rounds that reached the store.
    assert_eq!(store.puts().len(), 3);
    let resolved = client.resolve(&fixture.public_key_hex()).await.unwrap().unwrap();
    assert_eq!(resolved.info_hash, info_hash(1));
}

#[tokio::test]
async fn test_swarm_refusal_surfaces() {
    let fixture = TestFixture::with_seed([0x42; 32]);
    let swarm = Arc::new(RejectingSwarm::new());
    let client = MutableClient::from_shared(
        Arc::clone(&fixture.store),
        Arc::clone(&swarm),
        ClientConfig::default(),
    );
    client
        .publish(&fixture.keypair, &info_hash(9), PublishOptions::default())
        .await
        .unwrap();

    let err = client
        .add_by_link(&fixture.link(), JoinOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Swarm(_)));
    assert_eq!(
        swarm.attempts(),
        vec![format!("{}&xt=urn:btih:{}", fixture.link(), info_hash(9))]
    );
}

#[tokio::test]
async fn test_parties_do_not_collide() {
    let parties = multi_party_fixtures(4);
    for (i, party) in parties.iter().enumerate() {
        party
            .client()
            .publish(&party.keypair, &info_hash(i as u8), PublishOptions::default())
            .await
            .unwrap();
    }

    let reader = parties[0].client();
    for (i, party) in parties.iter().enumerate() {
        let resolved = reader.resolve(&party.public_key_hex()).await.unwrap().unwrap();
        assert_eq!(resolved.info_hash, info_hash(i as u8));
        assert_eq!(resolved.sequence, 0);
    }
    assert_eq!(parties[0].store.len().unwrap(), 4);
}

#[tokio::test]
async fn test_racing_publishers_highest_sequence_wins() {
    // Two devices holding the same key publish off the same observed state.
    let parties = multi_party_fixtures(1);
    let fixture = &parties[0];
    let device_a = fixture.client();
    let device_b = fixture.client();

    device_a
        .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
        .await
        .unwrap();
    let b = device_b
        .publish(&fixture.keypair, &info_hash(2), PublishOptions::default())
        .await
        .unwrap();
    assert_eq!(b.sequence, 1);

    // A stale write at the sequence B already used is refused.
    let stale = fixture.make_record(1, &info_hash(3));
    let err = mutable_torrent::store::RecordStore::put(fixture.store.as_ref(), &stale)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::SequenceConflict { seq: 1 }));

    let resolved = device_a.resolve(&fixture.public_key_hex()).await.unwrap().unwrap();
    assert_eq!(resolved.info_hash, info_hash(2));
}

#[tokio::test]
async fn test_sqlite_node_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");
    let fixture = TestFixture::with_seed([0x42; 32]);

    {
        let client = MutableClient::new(
            SqliteStore::open(&path).unwrap(),
            MemorySwarm::new(),
            ClientConfig::default(),
        );
        client
            .publish(&fixture.keypair, &info_hash(1), PublishOptions::default())
            .await
            .unwrap();
        client
            .publish(&fixture.keypair, &info_hash(2), PublishOptions::default())
            .await
            .unwrap();
    }

    let client = MutableClient::new(
        SqliteStore::open(&path).unwrap(),
        MemorySwarm::new(),
        ClientConfig::default(),
    );
    client.republish(&fixture.public_key_hex()).await.unwrap();

    let handle = client
        .add_by_link(&fixture.link(), JoinOptions::default())
        .await
        .unwrap();
    assert_eq!(handle.info_hash, Some(info_hash(2)));
    assert_eq!(handle.sequence(), Some(1));
}
