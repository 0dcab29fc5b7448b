//! Cart and wishlist state containers.
//!
//! Both stores follow the same design: the in-memory collection is the
//! active source of truth for rendering, mutations are optimistic and
//! synchronous, and persistence (local cache mirror plus best-effort
//! remote sync) happens on the background worker. No store operation
//! returns an error or blocks on the network.
//!
//! Stores are constructed instances, not globals: tests and embedding
//! code wire a [`crate::CommerceClient`] and [`crate::SnapshotCache`]
//! into each store and drive its `hydrate()`/`dispose()` lifecycle.

mod cart;
mod wishlist;

pub use cart::CartStore;
pub use wishlist::WishlistStore;

/// Store lifecycle state.
///
/// A store is `Loading` from construction until `hydrate()` completes.
/// Mutation operations are defined in `Ready`; the store does not guard
/// against earlier calls - consumers gate on the state, the way the UI
/// gates rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Loading,
    Ready,
}
