//! Wishlist state container.
//!
//! Structurally the cart's simpler sibling: no quantity, no variant
//! dimension, no derived totals. Uniqueness is per product id and adding
//! an already-present id is a no-op.

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use fixhub_core::ProductId;

use crate::api::CommerceClient;
use crate::cache::{self, SnapshotCache};
use crate::sync::{RemoteOp, SyncEvent, SyncHandle};
use crate::types::WishlistEntry;

use super::StoreState;

struct WishlistState {
    entries: Vec<WishlistEntry>,
    phase: StoreState,
}

/// Saved-for-later store.
pub struct WishlistStore {
    state: Mutex<WishlistState>,
    client: CommerceClient,
    cache: SnapshotCache,
    sync: SyncHandle,
}

impl WishlistStore {
    /// Create an empty wishlist store in the `Loading` state.
    ///
    /// Spawns the store's sync worker, so this must be called within a
    /// Tokio runtime.
    #[must_use]
    pub fn new(client: CommerceClient, cache: SnapshotCache, sync_max_attempts: u32) -> Self {
        let sync = SyncHandle::spawn(
            cache::WISHLIST_SLOT,
            client.clone(),
            cache.clone(),
            sync_max_attempts,
        );
        Self {
            state: Mutex::new(WishlistState {
                entries: Vec::new(),
                phase: StoreState::Loading,
            }),
            client,
            cache,
            sync,
        }
    }

    /// Populate the wishlist from persistence and transition to `Ready`.
    ///
    /// Same remote-then-local-fallback pattern as the cart. Never returns
    /// an error.
    pub async fn hydrate(&self) {
        let entries = if self.client.is_authenticated() {
            match self.client.fetch_wishlist().await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Wishlist hydrate from remote failed; falling back to local cache");
                    self.cache
                        .load(cache::WISHLIST_SLOT)
                        .await
                        .unwrap_or_default()
                }
            }
        } else {
            self.cache
                .load(cache::WISHLIST_SLOT)
                .await
                .unwrap_or_default()
        };

        let mut state = self.state.lock();
        debug!(entries = entries.len(), "Wishlist hydrated");
        state.entries = entries;
        state.phase = StoreState::Ready;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        self.state.lock().phase
    }

    /// Whether the initial hydrate is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == StoreState::Loading
    }

    // =========================================================================
    // Mutations (optimistic, never error)
    // =========================================================================

    /// Save an item. No-op if the product id is already present.
    pub fn add_item(&self, entry: &WishlistEntry) {
        let mut state = self.state.lock();
        if state
            .entries
            .iter()
            .any(|e| e.product_id == entry.product_id)
        {
            return;
        }
        state.entries.push(entry.clone());

        self.enqueue(
            &state,
            Some(RemoteOp::WishlistAdd {
                product_id: entry.product_id.clone(),
            }),
        );
    }

    /// Remove an item by product id. No-op if absent.
    pub fn remove_item(&self, product_id: &ProductId) {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.product_id != *product_id);
        if state.entries.len() == before {
            return;
        }

        self.enqueue(
            &state,
            Some(RemoteOp::WishlistRemove {
                product_id: product_id.clone(),
            }),
        );
    }

    /// Empty the wishlist.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        self.enqueue(&state, Some(RemoteOp::WishlistClear));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Pure membership check over in-memory state. No I/O.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.state
            .lock()
            .entries
            .iter()
            .any(|e| e.product_id == *product_id)
    }

    /// Snapshot of the current entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<WishlistEntry> {
        self.state.lock().entries.clone()
    }

    /// Number of saved items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the wishlist has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Subscribe to background sync failure events.
    #[must_use]
    pub fn sync_events(&self) -> watch::Receiver<Option<SyncEvent>> {
        self.sync.subscribe()
    }

    /// Wait until every enqueued persistence command has been processed.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Drain the sync queue and stop the worker.
    pub async fn dispose(self) {
        self.sync.shutdown().await;
    }

    fn enqueue(&self, state: &WishlistState, remote_op: Option<RemoteOp>) {
        match serde_json::to_value(&state.entries) {
            Ok(snapshot) => self.sync.enqueue(snapshot, remote_op),
            Err(e) => warn!(error = %e, "Failed to serialize wishlist snapshot"),
        }
    }
}
