//! Encoded raster snapshots.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// MIME type of every snapshot.
pub const SNAPSHOT_MIME: &str = "image/png";

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Snapshot parsing errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Not a PNG data URL")]
    NotPngDataUrl,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Snapshot is empty")]
    Empty,
}

/// Immutable PNG encoding of the raster at one instant.
///
/// Clones share the same bytes, so the undo and redo stacks hold snapshots
/// cheaply.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    bytes: Arc<[u8]>,
}

impl Snapshot {
    /// Wrap already-encoded PNG bytes.
    pub fn from_png_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:image/png;base64,...` form handed to web hosts.
    pub fn to_data_url(&self) -> String {
        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + self.bytes.len() * 4 / 3 + 4);
        url.push_str(DATA_URL_PREFIX);
        STANDARD.encode_string(&self.bytes, &mut url);
        url
    }

    /// Parse a PNG data URL.
    pub fn from_data_url(url: &str) -> Result<Self, SnapshotError> {
        let payload = url
            .trim()
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(SnapshotError::NotPngDataUrl)?;
        let bytes = STANDARD.decode(payload)?;
        if bytes.is_empty() {
            return Err(SnapshotError::Empty);
        }
        Ok(Self::from_png_bytes(bytes))
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl AsRef<[u8]> for Snapshot {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
