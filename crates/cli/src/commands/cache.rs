//! Snapshot cache commands.
//!
//! These operate on the cache directory directly (resolved from
//! `FIXHUB_CACHE_DIR`), so they work without the remote API configured.

use clap::ValueEnum;

use fixhub_client::SnapshotCache;
use fixhub_client::cache;
use fixhub_client::config::cache_dir_from_env;

/// Snapshot slot selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Slot {
    Cart,
    Wishlist,
}

impl Slot {
    const fn key(self) -> &'static str {
        match self {
            Self::Cart => cache::CART_SLOT,
            Self::Wishlist => cache::WISHLIST_SLOT,
        }
    }
}

/// Print a slot's cached snapshot as pretty JSON.
pub async fn show(slot: Slot) -> Result<(), Box<dyn std::error::Error>> {
    let cache = SnapshotCache::new(cache_dir_from_env());

    match cache.load::<serde_json::Value>(slot.key()).await {
        Some(items) => println!("{}", serde_json::to_string_pretty(&items)?),
        None => println!("(no {} snapshot)", slot.key()),
    }
    Ok(())
}

/// Remove a slot's cached snapshot.
pub async fn clear(slot: Slot) -> Result<(), Box<dyn std::error::Error>> {
    let cache = SnapshotCache::new(cache_dir_from_env());
    cache.clear(slot.key()).await?;
    println!("Cleared {} snapshot", slot.key());
    Ok(())
}

/// Print the snapshot cache directory.
pub fn path() {
    println!("{}", cache_dir_from_env().display());
}
