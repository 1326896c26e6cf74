//! Auto-save of committed snapshots.
//!
//! The engine reports every committed state through [`SaveHandler`].
//! [`AutoSaveManager`] keeps the latest snapshot per document id and writes
//! them to its storage backend when flushed.

use crate::snapshot::Snapshot;
use crate::storage::{Storage, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default minimum time between two flushes, in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Receives every committed snapshot together with the document id.
pub trait SaveHandler {
    fn on_save(&mut self, id: &str, snapshot: &Snapshot);
}

impl<F> SaveHandler for F
where
    F: FnMut(&str, &Snapshot),
{
    fn on_save(&mut self, id: &str, snapshot: &Snapshot) {
        self(id, snapshot)
    }
}

#[derive(Default)]
struct PendingSaves {
    /// Latest unsaved snapshot per document id.
    snapshots: HashMap<String, Snapshot>,
    last_save: Option<Instant>,
}

/// Buffers committed snapshots and persists them to a [`Storage`] backend.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    pending: Mutex<PendingSaves>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            pending: Mutex::new(PendingSaves::default()),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn pending(&self) -> MutexGuard<'_, PendingSaves> {
        // A poisoned map is still a valid map.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remember `snapshot` as the unsaved state of `id`, replacing any older one.
    pub fn record(&self, id: &str, snapshot: &Snapshot) {
        self.pending().snapshots.insert(id.to_string(), snapshot.clone());
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending().snapshots.is_empty()
    }

    /// Whether dirty and the interval has elapsed since the last flush.
    pub fn should_flush(&self) -> bool {
        let pending = self.pending();
        if pending.snapshots.is_empty() {
            return false;
        }
        match pending.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Flush if [`Self::should_flush`]. Returns whether anything was written.
    pub async fn maybe_flush(&self) -> StorageResult<bool> {
        if !self.should_flush() {
            return Ok(false);
        }
        self.flush().await?;
        Ok(true)
    }

    /// Write every pending snapshot. Returns the number written.
    ///
    /// Snapshots that fail to save are put back unless a newer one was
    /// recorded for the same id in the meantime.
    pub async fn flush(&self) -> StorageResult<usize> {
        let batch = std::mem::take(&mut self.pending().snapshots);
        let mut written = 0;
        let mut failed = Vec::new();
        let mut first_error = None;

        for (id, snapshot) in batch {
            match self.storage.save(&id, &snapshot).await {
                Ok(()) => written += 1,
                Err(e) => {
                    log::error!("Failed to save snapshot {}: {}", id, e);
                    failed.push((id, snapshot));
                    first_error.get_or_insert(e);
                }
            }
        }

        let mut pending = self.pending();
        pending.last_save = Some(Instant::now());
        for (id, snapshot) in failed {
            pending.snapshots.entry(id).or_insert(snapshot);
        }
        drop(pending);

        match first_error {
            Some(e) => Err(e),
            None => {
                log::info!("Auto-saved {} snapshot(s)", written);
                Ok(written)
            }
        }
    }

    /// Load a snapshot, preferring an unsaved one.
    pub async fn load(&self, id: &str) -> StorageResult<Snapshot> {
        if let Some(snapshot) = self.pending().snapshots.get(id).cloned() {
            return Ok(snapshot);
        }
        self.storage.load(id).await
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.pending().snapshots.remove(id);
        self.storage.delete(id).await
    }

    pub async fn list(&self) -> StorageResult<Vec<String>> {
        self.storage.list().await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// A [`SaveHandler`] feeding this manager.
    pub fn handler(self: &Arc<Self>) -> AutoSaveHandle<S> {
        AutoSaveHandle(Arc::clone(self))
    }
}

/// [`SaveHandler`] sharing an [`AutoSaveManager`].
pub struct AutoSaveHandle<S: Storage>(Arc<AutoSaveManager<S>>);

impl<S: Storage> SaveHandler for AutoSaveHandle<S> {
    fn on_save(&mut self, id: &str, snapshot: &Snapshot) {
        log::debug!("Recording snapshot for {} ({} bytes)", id, snapshot.len());
        self.0.record(id, snapshot);
    }
}
