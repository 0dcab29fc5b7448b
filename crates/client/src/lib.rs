//! FixHub session commerce layer.
//!
//! This crate owns the shopping cart and wishlist state for a FixHub
//! storefront session. The in-memory collections are the active source of
//! truth for rendering; the remote commerce API is consulted at hydrate
//! time and after each mutation on a best-effort basis; a durable local
//! snapshot cache is the fallback when the API is unreachable or the
//! session has no auth token.
//!
//! # Architecture
//!
//! - Mutations are optimistic: they update in-memory state synchronously,
//!   then enqueue a command for the background sync worker. Callers never
//!   wait on the network and never receive an error.
//! - One sync worker per store mirrors every snapshot to the local cache
//!   and replays remote intents in issue order, retrying with backoff.
//!   Persistent failures surface as non-blocking [`SyncEvent`]s.
//! - Once authenticated, the remote store is the sole authority: hydrate
//!   adopts the remote collection on success and the local cache is only
//!   a cold-start/offline fallback.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixhub_client::{CartStore, ClientConfig, CommerceClient, SnapshotCache};
//!
//! let config = ClientConfig::from_env()?;
//! let client = CommerceClient::new(&config);
//! let cache = SnapshotCache::new(&config.cache_dir);
//!
//! let cart = CartStore::new(client, cache, config.sync_max_attempts);
//! cart.hydrate().await;
//!
//! cart.add_item(&product, 1);
//! assert_eq!(cart.count(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod store;
pub mod sync;
pub mod types;

pub use api::CommerceClient;
pub use cache::SnapshotCache;
pub use config::ClientConfig;
pub use store::{CartStore, StoreState, WishlistStore};
pub use sync::SyncEvent;
pub use types::{CartLine, Product, WishlistEntry};
