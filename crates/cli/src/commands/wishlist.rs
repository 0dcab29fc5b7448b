//! Wishlist debugging command.

use fixhub_client::{ClientConfig, CommerceClient, SnapshotCache, WishlistStore};

/// Construct an isolated wishlist store from the environment, hydrate it,
/// and print what it sees.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let client = CommerceClient::new(&config);
    let cache = SnapshotCache::new(&config.cache_dir);

    let wishlist = WishlistStore::new(client, cache, config.sync_max_attempts);
    wishlist.hydrate().await;

    let items = wishlist.items();
    if items.is_empty() {
        println!("Wishlist is empty");
    } else {
        for entry in &items {
            println!(
                "{:<40} {:>10}  {}",
                entry.title,
                entry.price.display(),
                entry.product_id
            );
        }
        println!("{} item(s)", wishlist.len());
    }

    wishlist.dispose().await;
    Ok(())
}
