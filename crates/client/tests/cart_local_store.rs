//! Unauthenticated cart flows: everything stays local, the snapshot
//! cache is the only persistence, and no HTTP traffic is ever issued.

#![allow(clippy::unwrap_used)]

mod support;

use std::path::Path;

use url::Url;

use fixhub_client::cache::CART_SLOT;
use fixhub_client::{CartLine, CartStore, ClientConfig, CommerceClient, SnapshotCache};

use support::{MockApi, product};

fn local_config(base: &str, cache_dir: &Path) -> ClientConfig {
    // No token: the URL must never be dialed
    ClientConfig::new(Url::parse(base).unwrap()).with_cache_dir(cache_dir)
}

fn cart_store(config: &ClientConfig) -> CartStore {
    CartStore::new(
        CommerceClient::new(config),
        SnapshotCache::new(&config.cache_dir),
        config.sync_max_attempts,
    )
}

#[tokio::test]
async fn test_unauthenticated_adds_merge_and_persist_without_network() {
    let api = MockApi::new();
    let base = api.spawn().await;
    let dir = tempfile::tempdir().unwrap();

    let cart = cart_store(&local_config(&base, dir.path()));
    cart.hydrate().await;

    let p = product("laptop-fan", None, 2250);
    cart.add_item(&p, 2);
    cart.add_item(&p, 3);
    cart.flush().await;

    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().quantity, 5);

    // No network call of any kind was attempted
    assert!(api.requests().is_empty());

    // The durable cache holds the merged snapshot
    let cached: Vec<CartLine> = SnapshotCache::new(dir.path())
        .load(CART_SLOT)
        .await
        .unwrap();
    assert_eq!(cached, items);
    cart.dispose().await;
}

#[tokio::test]
async fn test_snapshot_survives_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config("http://127.0.0.1:1", dir.path());

    let cart = cart_store(&config);
    cart.hydrate().await;
    cart.add_item(&product("screwdriver-kit", None, 1899), 1);
    cart.add_item(&product("spudger", None, 349), 4);
    cart.flush().await;
    let items = cart.items();
    cart.dispose().await;

    // A fresh session on the same cache dir picks the cart back up
    let revived = cart_store(&config);
    revived.hydrate().await;
    assert_eq!(revived.items(), items);
    revived.dispose().await;
}

#[tokio::test]
async fn test_malformed_cache_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "{definitely not json").unwrap();

    let cart = cart_store(&local_config("http://127.0.0.1:1", dir.path()));
    cart.hydrate().await;

    assert!(cart.is_empty());
    cart.dispose().await;
}

#[tokio::test]
async fn test_unknown_snapshot_version_hydrates_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cart.json"),
        r#"{"version": 99, "saved_at": "2026-01-01T00:00:00Z", "items": [{"bogus": true}]}"#,
    )
    .unwrap();

    let cart = cart_store(&local_config("http://127.0.0.1:1", dir.path()));
    cart.hydrate().await;

    assert!(cart.is_empty());
    cart.dispose().await;
}

#[tokio::test]
async fn test_clear_persists_empty_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config("http://127.0.0.1:1", dir.path());

    let cart = cart_store(&config);
    cart.hydrate().await;
    cart.add_item(&product("case", None, 999), 1);
    cart.clear();
    cart.flush().await;
    cart.dispose().await;

    let cached: Vec<CartLine> = SnapshotCache::new(dir.path())
        .load(CART_SLOT)
        .await
        .unwrap();
    assert!(cached.is_empty());
}
