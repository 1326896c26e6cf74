//! File-based storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::snapshot::{SNAPSHOT_MIME, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "png";

/// Stores each snapshot as `<id>.png` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        log::debug!("Snapshot storage at {} ({})", base_path.display(), SNAPSHOT_MIME);
        Ok(Self { base_path })
    }

    /// File storage in the platform data directory.
    ///
    /// On Unix: `~/.local/share/sketchpad/snapshots/`
    /// On Windows: `%LOCALAPPDATA%\sketchpad\snapshots\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("sketchpad").join("snapshots"))
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.{}", safe_id, EXTENSION))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, snapshot: &Snapshot) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.snapshot_path(id);
        let snapshot = snapshot.clone();
        Box::pin(async move {
            fs::write(&path, snapshot.as_bytes()).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Snapshot>> {
        let path = self.snapshot_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let bytes = fs::read(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok(Snapshot::from_png_bytes(bytes))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.snapshot_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.snapshot_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
