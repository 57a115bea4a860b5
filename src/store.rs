//! TTL-keyed batch store with snapshot persistence.
//!
//! The store maps monotonically increasing [`BatchId`]s to probed batches.
//! Ids are never reused: refresh replaces a batch in place and the reaper
//! (when enabled) only removes entries, never lowers the counter. The
//! whole map can be written to a JSON snapshot (atomically, via a
//! temporary file and rename) and restored on startup.

use crate::error::{Error, Result};
use crate::types::{Batch, BatchId, LinkInfo};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Mutable store state, guarded as one unit so id allocation and entry
/// insertion are a single atomic step.
struct Inner {
    entries: HashMap<BatchId, Batch>,
    next_id: u64,
}

/// TTL-keyed mapping from batch id to batch contents.
///
/// Reads proceed concurrently; `create`, `refresh`, and the serialization
/// phase of `save` are mutually exclusive with all other access. The store
/// never evicts on its own - see [`spawn_reaper`] for the opt-in reaper.
pub struct BatchStore {
    inner: RwLock<Inner>,
    ttl: Duration,
}

impl BatchStore {
    /// Create an empty store whose batches stay fresh for `ttl` after
    /// creation or refresh.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                next_id: 1,
            }),
            ttl,
        }
    }

    /// The configured batch time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a batch. Returns the stored links and whether the batch has
    /// expired, or `None` if the id was never issued (or was reaped).
    /// Side-effect-free: expiry is observed, not acted upon.
    pub fn lookup(&self, id: BatchId) -> Option<(Vec<LinkInfo>, bool)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let batch = inner.entries.get(&id)?;
        let expired = Utc::now() > batch.expires_at;

        Some((batch.data.clone(), expired))
    }

    /// Store a new batch and return its freshly allocated id.
    pub fn create(&self, data: Vec<LinkInfo>) -> BatchId {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let id = BatchId(inner.next_id);
        inner.next_id += 1;
        inner.entries.insert(
            id,
            Batch {
                data,
                expires_at: Utc::now() + self.ttl,
            },
        );

        id
    }

    /// Replace the contents of an existing batch and reset its expiry.
    ///
    /// A refresh of an unknown id is silently ignored; the caller is
    /// expected to have just observed the id existed.
    pub fn refresh(&self, id: BatchId, data: Vec<LinkInfo>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = self.ttl;

        if let Some(batch) = inner.entries.get_mut(&id) {
            *batch = Batch {
                data,
                expires_at: Utc::now() + ttl,
            };
        }
    }

    /// Number of stored batches.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether the store holds no batches.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All currently stored batch ids, sorted ascending.
    pub fn ids(&self) -> Vec<BatchId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<BatchId> = inner.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Remove batches that have been stale for longer than `grace`.
    /// Returns the number of removed batches. The id counter is untouched,
    /// so removal never causes id reuse.
    pub fn reap_stale(&self, grace: Duration) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();

        let before = inner.entries.len();
        inner.entries.retain(|_, batch| now <= batch.expires_at + grace);
        before - inner.entries.len()
    }

    /// Write the entire store to `path` as a JSON snapshot.
    ///
    /// Serialization happens under the write lock; the bytes are then
    /// written to a sibling temporary file and atomically renamed into
    /// place, so a crash mid-write cannot corrupt an existing snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let bytes = {
            let inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_vec_pretty(&inner.entries)?
        };

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;

        tracing::debug!(path = %path.display(), batches = self.len(), "Snapshot written");
        Ok(())
    }

    /// Restore the store from a JSON snapshot at `path`.
    ///
    /// A missing or empty file means "start from an empty store" and is
    /// not an error. Malformed content fails with [`Error::Snapshot`] and
    /// leaves the store untouched. On success the id counter is set to
    /// `max(restored ids) + 1`, so no future id collides with restored
    /// data.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No snapshot found, starting empty");
                return Ok(());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        if bytes.is_empty() {
            tracing::debug!(path = %path.display(), "Empty snapshot, starting empty");
            return Ok(());
        }

        let entries: HashMap<BatchId, Batch> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Snapshot(format!("malformed snapshot {}: {}", path.display(), e))
        })?;

        let next_id = entries.keys().map(|id| id.0).max().unwrap_or(0) + 1;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.entries = entries;
        inner.next_id = next_id;

        tracing::info!(
            path = %path.display(),
            batches = inner.entries.len(),
            next_id,
            "Snapshot restored"
        );
        Ok(())
    }

    /// Expiry timestamp of a stored batch, for assertions on refresh
    /// behavior.
    #[cfg(test)]
    pub(crate) fn expires_at(&self, id: BatchId) -> Option<chrono::DateTime<Utc>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(&id).map(|b| b.expires_at)
    }
}

/// Spawn the background reaper task.
///
/// Every TTL interval the task removes batches that have been stale for
/// more than `multiples` TTLs. The task ends when `shutdown` is cancelled.
pub fn spawn_reaper(
    store: std::sync::Arc<BatchStore>,
    multiples: u32,
    shutdown: tokio_util::sync::CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let period = store.ttl();
    let grace = store.ttl() * multiples;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Reaper stopping");
                    break;
                }
                _ = interval.tick() => {
                    let reaped = store.reap_stale(grace);
                    if reaped > 0 {
                        tracing::info!(reaped, remaining = store.len(), "Reaped stale batches");
                    }
                }
            }
        }
    })
}
