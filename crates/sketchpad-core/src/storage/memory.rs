//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::snapshot::Snapshot;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, snapshot: &Snapshot) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let snapshot = snapshot.clone();
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(lock_error)?;
            snapshots.insert(id, snapshot);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Snapshot>> {
        let id = id.to_string();
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            snapshots
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(lock_error)?;
            snapshots.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            Ok(snapshots.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            Ok(snapshots.contains_key(&id))
        })
    }
}
