//! Background sync worker.
//!
//! Every store mutation enqueues a command carrying the fresh collection
//! snapshot and, when something remote-visible changed, a typed remote
//! intent. One worker task per store consumes the queue strictly FIFO:
//! it mirrors the snapshot to the local cache first (always), then
//! replays the remote intent against the commerce API when a token is
//! configured.
//!
//! Remote dispatch retries with exponential backoff and jitter. A rate
//! limit waits the server's hint instead; an auth failure is not retried.
//! Exhausted retries emit a [`SyncEvent`] on a watch channel and the
//! worker moves on - a flaky network never blocks, errors, or rolls back
//! the optimistic local state.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use fixhub_core::ProductId;

use crate::api::{ApiError, CommerceClient};
use crate::cache::SnapshotCache;

const BACKOFF_BASE_MS: u64 = 200;
const BACKOFF_MAX_EXPONENT: u32 = 6;
const RATE_LIMIT_WAIT_CAP_SECS: u64 = 30;

/// A remote-visible mutation intent.
///
/// Each intent carries its own explicit target rather than a diff, so
/// replaying intents in issue order converges the remote store.
#[derive(Debug, Clone)]
pub enum RemoteOp {
    CartAdd {
        product_id: ProductId,
        quantity: u32,
        variant: Option<String>,
    },
    CartRemove {
        product_id: ProductId,
        variant: Option<String>,
    },
    CartSetQuantity {
        product_id: ProductId,
        quantity: u32,
        variant: Option<String>,
    },
    CartClear,
    WishlistAdd {
        product_id: ProductId,
    },
    WishlistRemove {
        product_id: ProductId,
    },
    WishlistClear,
}

impl RemoteOp {
    /// Short human-readable label for logs and sync events.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::CartAdd { .. } => "add cart item",
            Self::CartRemove { .. } => "remove cart item",
            Self::CartSetQuantity { .. } => "update cart quantity",
            Self::CartClear => "clear cart",
            Self::WishlistAdd { .. } => "add wishlist item",
            Self::WishlistRemove { .. } => "remove wishlist item",
            Self::WishlistClear => "clear wishlist",
        }
    }
}

/// Non-blocking notification from the sync worker.
///
/// Subscribing is optional; an embedding UI can surface these as a
/// notice. The optimistic local state is unaffected either way.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A remote intent was dropped after its retry budget ran out.
    RemoteSyncFailed {
        /// Label of the dropped operation.
        op: &'static str,
        /// Last error observed.
        detail: String,
    },
}

/// A queued unit of work: snapshot mirror plus optional remote intent.
struct SyncCommand {
    id: Uuid,
    snapshot: serde_json::Value,
    remote_op: Option<RemoteOp>,
}

enum WorkerMessage {
    Command(SyncCommand),
    Flush(oneshot::Sender<()>),
}

/// Handle owned by a store: enqueue side of the worker queue.
pub(crate) struct SyncHandle {
    slot: &'static str,
    tx: mpsc::UnboundedSender<WorkerMessage>,
    events: watch::Receiver<Option<SyncEvent>>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Spawn a worker for one cache slot. Must be called within a Tokio
    /// runtime.
    pub fn spawn(
        slot: &'static str,
        client: CommerceClient,
        cache: SnapshotCache,
        max_attempts: u32,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = watch::channel(None);

        let worker = SyncWorker {
            slot,
            client,
            cache,
            // A zero budget would drop every intent without trying once
            max_attempts: max_attempts.max(1),
            events: event_tx,
        };
        let task = tokio::spawn(worker.run(rx));

        Self {
            slot,
            tx,
            events: event_rx,
            task,
        }
    }

    /// Enqueue a snapshot mirror plus optional remote intent.
    ///
    /// Never blocks. After `shutdown` the command is dropped with a
    /// warning; mutating a disposed store is a caller bug, not a panic.
    pub fn enqueue(&self, snapshot: serde_json::Value, remote_op: Option<RemoteOp>) {
        let command = SyncCommand {
            id: Uuid::new_v4(),
            snapshot,
            remote_op,
        };
        if self.tx.send(WorkerMessage::Command(command)).is_err() {
            warn!(slot = self.slot, "Sync worker stopped; dropping command");
        }
    }

    /// Subscribe to sync failure events.
    pub fn subscribe(&self) -> watch::Receiver<Option<SyncEvent>> {
        self.events.clone()
    }

    /// Wait until every previously enqueued command has been processed.
    ///
    /// The flush marker travels the same FIFO queue as commands, so when
    /// it is answered everything enqueued before it has completed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WorkerMessage::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Close the queue, drain remaining commands, and wait for the worker
    /// to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            error!(slot = self.slot, error = %e, "Sync worker task failed");
        }
    }
}

/// The consuming side: one task per store.
struct SyncWorker {
    slot: &'static str,
    client: CommerceClient,
    cache: SnapshotCache,
    max_attempts: u32,
    events: watch::Sender<Option<SyncEvent>>,
}

impl SyncWorker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<WorkerMessage>) {
        while let Some(message) = rx.recv().await {
            match message {
                WorkerMessage::Command(command) => self.process(command).await,
                WorkerMessage::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!(slot = self.slot, "Sync worker drained and stopped");
    }

    #[instrument(skip(self, command), fields(slot = self.slot, command_id = %command.id))]
    async fn process(&self, command: SyncCommand) {
        // Mirror first: the local cache must reflect the optimistic state
        // even when the remote dispatch fails afterwards.
        if let Err(e) = self.cache.store(self.slot, &command.snapshot).await {
            warn!(error = %e, "Failed to mirror snapshot to local cache");
        }

        let Some(op) = command.remote_op else {
            return;
        };
        if !self.client.is_authenticated() {
            return;
        }
        self.dispatch(op).await;
    }

    async fn dispatch(&self, op: RemoteOp) {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.apply(&op).await {
                Ok(()) => {
                    debug!(op = op.describe(), attempt, "Remote sync applied");
                    return;
                }
                Err(e) if !e.is_retryable() => {
                    warn!(op = op.describe(), error = %e, "Remote sync rejected; not retrying");
                    self.notify_failure(&op, &e);
                    return;
                }
                Err(e) if attempt < self.max_attempts => {
                    let delay = retry_delay(&e, attempt);
                    warn!(
                        op = op.describe(),
                        attempt,
                        error = %e,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Remote sync failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        op = op.describe(),
                        attempts = attempt,
                        error = %e,
                        "Remote sync failed; giving up"
                    );
                    self.notify_failure(&op, &e);
                    return;
                }
            }
        }
    }

    fn notify_failure(&self, op: &RemoteOp, error: &ApiError) {
        let _ = self.events.send(Some(SyncEvent::RemoteSyncFailed {
            op: op.describe(),
            detail: error.to_string(),
        }));
    }

    async fn apply(&self, op: &RemoteOp) -> Result<(), ApiError> {
        match op {
            RemoteOp::CartAdd {
                product_id,
                quantity,
                variant,
            } => {
                self.client
                    .add_cart_item(product_id, *quantity, variant.as_deref())
                    .await
            }
            RemoteOp::CartRemove {
                product_id,
                variant,
            } => {
                self.client
                    .remove_cart_item(product_id, variant.as_deref())
                    .await
            }
            RemoteOp::CartSetQuantity {
                product_id,
                quantity,
                variant,
            } => {
                self.client
                    .update_cart_quantity(product_id, *quantity, variant.as_deref())
                    .await
            }
            RemoteOp::CartClear => self.client.clear_cart().await,
            RemoteOp::WishlistAdd { product_id } => {
                self.client.add_wishlist_item(product_id).await
            }
            RemoteOp::WishlistRemove { product_id } => {
                self.client.remove_wishlist_item(product_id).await
            }
            RemoteOp::WishlistClear => self.client.clear_wishlist().await,
        }
    }
}

/// Delay before the next attempt: the server's rate-limit hint when
/// given, otherwise exponential backoff with +-50% jitter.
fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimited(secs) = error {
        return Duration::from_secs((*secs).min(RATE_LIMIT_WAIT_CAP_SECS));
    }

    let exponent = attempt.saturating_sub(1).min(BACKOFF_MAX_EXPONENT);
    let base = BACKOFF_BASE_MS * 2u64.pow(exponent);
    let jitter = rand::random_range(0..=base);
    Duration::from_millis(base / 2 + jitter)
}
