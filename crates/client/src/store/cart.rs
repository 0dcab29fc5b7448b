//! Shopping cart state container.

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use fixhub_core::{CurrencyCode, Price, ProductId};

use crate::api::CommerceClient;
use crate::cache::{self, SnapshotCache};
use crate::sync::{RemoteOp, SyncEvent, SyncHandle};
use crate::types::{CartLine, Product};

use super::StoreState;

struct CartState {
    lines: Vec<CartLine>,
    phase: StoreState,
}

/// Shopping cart store.
///
/// Line items live in insertion order behind a short mutex; identity
/// matching is a linear scan, fine at cart scale. Derived aggregates
/// (`count`, `total`) are recomputed per read, never stored.
pub struct CartStore {
    state: Mutex<CartState>,
    client: CommerceClient,
    cache: SnapshotCache,
    sync: SyncHandle,
}

impl CartStore {
    /// Create an empty cart store in the `Loading` state.
    ///
    /// Spawns the store's sync worker, so this must be called within a
    /// Tokio runtime.
    #[must_use]
    pub fn new(client: CommerceClient, cache: SnapshotCache, sync_max_attempts: u32) -> Self {
        let sync = SyncHandle::spawn(
            cache::CART_SLOT,
            client.clone(),
            cache.clone(),
            sync_max_attempts,
        );
        Self {
            state: Mutex::new(CartState {
                lines: Vec::new(),
                phase: StoreState::Loading,
            }),
            client,
            cache,
            sync,
        }
    }

    /// Populate the cart from persistence and transition to `Ready`.
    ///
    /// Authenticated sessions adopt the remote cart; on remote failure
    /// (or without a token) the local snapshot cache is used, empty if
    /// absent. Never returns an error.
    pub async fn hydrate(&self) {
        let lines = if self.client.is_authenticated() {
            match self.client.fetch_cart().await {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(error = %e, "Cart hydrate from remote failed; falling back to local cache");
                    self.cache.load(cache::CART_SLOT).await.unwrap_or_default()
                }
            }
        } else {
            self.cache.load(cache::CART_SLOT).await.unwrap_or_default()
        };

        let mut state = self.state.lock();
        debug!(lines = lines.len(), "Cart hydrated");
        state.lines = lines;
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

    /// Add `quantity` of a product to the cart.
    ///
    /// A line with the same identity (product id AND variant) has its
    /// quantity incremented; otherwise a new line is appended. The
    /// in-memory update is synchronous; persistence follows in the
    /// background. `quantity` 0 is a no-op - the store never holds a
    /// non-positive quantity.
    pub fn add_item(&self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let mut state = self.state.lock();
        if let Some(line) = state
            .lines
            .iter_mut()
            .find(|l| l.matches(&product.id, product.variant.as_deref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            state.lines.push(CartLine::from_product(product, quantity));
        }

        self.enqueue(
            &state,
            Some(RemoteOp::CartAdd {
                product_id: product.id.clone(),
                quantity,
                variant: product.variant.clone(),
            }),
        );
    }

    /// Remove the line matching `(product_id, variant)`. No-op if absent.
    pub fn remove_item(&self, product_id: &ProductId, variant: Option<&str>) {
        let mut state = self.state.lock();
        let before = state.lines.len();
        state.lines.retain(|l| !l.matches(product_id, variant));
        if state.lines.len() == before {
            return;
        }

        self.enqueue(
            &state,
            Some(RemoteOp::CartRemove {
                product_id: product_id.clone(),
                variant: variant.map(ToOwned::to_owned),
            }),
        );
    }

    /// Set (not add) the matching line's quantity.
    ///
    /// `quantity` 0 deletes the line instead of storing a zero. No-op if
    /// the line does not exist.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32, variant: Option<&str>) {
        if quantity == 0 {
            self.remove_item(product_id, variant);
            return;
        }

        let mut state = self.state.lock();
        let Some(line) = state
            .lines
            .iter_mut()
            .find(|l| l.matches(product_id, variant))
        else {
            return;
        };
        line.quantity = quantity;

        self.enqueue(
            &state,
            Some(RemoteOp::CartSetQuantity {
                product_id: product_id.clone(),
                quantity,
                variant: variant.map(ToOwned::to_owned),
            }),
        );
    }

    /// Empty the cart.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.lines.clear();
        self.enqueue(&state, Some(RemoteOp::CartClear));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLine> {
        self.state.lock().lines.clone()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.state
            .lock()
            .lines
            .iter()
            .map(|l| l.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Sum of `unit_price x quantity` over all lines.
    ///
    /// Carts are single-currency; a line in a different currency than the
    /// first is skipped rather than mis-summed.
    #[must_use]
    pub fn total(&self) -> Price {
        let state = self.state.lock();
        let currency = state
            .lines
            .first()
            .map_or_else(CurrencyCode::default, |l| l.unit_price.currency_code);

        state
            .lines
            .iter()
            .fold(Price::zero(currency), |acc, line| {
                acc.checked_add(&line.line_total()).unwrap_or(acc)
            })
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().lines.is_empty()
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

    /// Serialize the collection and hand it to the sync worker, still
    /// under the state lock so commands enter the queue in mutation
    /// order.
    fn enqueue(&self, state: &CartState, remote_op: Option<RemoteOp>) {
        match serde_json::to_value(&state.lines) {
            Ok(snapshot) => self.sync.enqueue(snapshot, remote_op),
            Err(e) => warn!(error = %e, "Failed to serialize cart snapshot"),
        }
    }
}
