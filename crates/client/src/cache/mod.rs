//! Durable local snapshot cache.
//!
//! Two independent string-keyed slots (one per store), each a JSON file
//! under the configured cache directory holding the full serialized
//! collection. The cache is read at hydrate time when unauthenticated or
//! when the remote fetch fails, and written after every mutation.
//!
//! Snapshots are wrapped in a versioned, timestamped envelope. Anything
//! that cannot be read back - missing file, unparseable JSON, unknown
//! schema version - degrades to an absent cache rather than an error.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Slot key for the cart collection.
pub const CART_SLOT: &str = "cart";

/// Slot key for the wishlist collection.
pub const WISHLIST_SLOT: &str = "wishlist";

/// Snapshot schema version. Bump when the item shape changes; old
/// snapshots then read as empty instead of being migrated.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur when writing the snapshot cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed.
    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Versioned wrapper around a cached collection.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope<T> {
    version: u32,
    saved_at: DateTime<Utc>,
    items: T,
}

/// File-backed snapshot cache.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a slot's snapshot file.
    #[must_use]
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    /// Load a slot's collection.
    ///
    /// Returns `None` for an absent slot, and for anything unreadable:
    /// a malformed snapshot is indistinguishable from no snapshot.
    pub async fn load<T: DeserializeOwned>(&self, slot: &str) -> Option<T> {
        let path = self.slot_path(slot);
        let raw = tokio::fs::read_to_string(&path).await.ok()?;

        match serde_json::from_str::<SnapshotEnvelope<T>>(&raw) {
            Ok(envelope) if envelope.version == SNAPSHOT_VERSION => Some(envelope.items),
            Ok(envelope) => {
                warn!(
                    slot,
                    version = envelope.version,
                    "Discarding snapshot with unknown schema version"
                );
                None
            }
            Err(e) => {
                warn!(slot, error = %e, "Discarding unparseable snapshot");
                None
            }
        }
    }

    /// Write a slot's collection.
    ///
    /// Writes go through a temp file in the same directory followed by a
    /// rename, so a concurrent writer cannot leave a torn file - the last
    /// writer wins.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if serialization or the filesystem write
    /// fails.
    pub async fn store<T: Serialize>(&self, slot: &str, items: &T) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            items,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let tmp = self.dir.join(format!(".{slot}.json.tmp"));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, self.slot_path(slot)).await?;
        Ok(())
    }

    /// Remove a slot's snapshot file. An absent slot is a success.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the file exists but cannot be removed.
    pub async fn clear(&self, slot: &str) -> Result<(), CacheError> {
        match tokio::fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
