//! Cart debugging command.

use fixhub_client::{CartStore, ClientConfig, CommerceClient, SnapshotCache};

/// Construct an isolated cart store from the environment, hydrate it the
/// way a storefront session would, and print what it sees.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let client = CommerceClient::new(&config);
    let cache = SnapshotCache::new(&config.cache_dir);

    let source = if config.is_authenticated() {
        "remote (local fallback)"
    } else {
        "local cache"
    };

    let cart = CartStore::new(client, cache, config.sync_max_attempts);
    cart.hydrate().await;

    let items = cart.items();
    if items.is_empty() {
        println!("Cart is empty ({source})");
    } else {
        for line in &items {
            let variant = line.variant.as_deref().unwrap_or("-");
            println!(
                "{:<40} {:<12} x{:<4} {:>10}",
                line.title,
                variant,
                line.quantity,
                line.line_total().display()
            );
        }
        println!(
            "{} item(s), total {} ({source})",
            cart.count(),
            cart.total().display()
        );
    }

    cart.dispose().await;
    Ok(())
}
