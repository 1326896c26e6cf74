//! Asynchronous restore of history snapshots.

use sketchpad_core::{BoxFuture, Snapshot};
use sketchpad_render::{Raster, RenderResult, decode_png};
use std::task::{Context, Poll};

/// Turns a snapshot back into pixels.
///
/// Decoding is the only asynchronous step of the engine; hosts that decode
/// off-thread or through a browser image element supply their own.
pub trait SnapshotDecoder {
    fn decode(&self, snapshot: Snapshot) -> BoxFuture<'static, RenderResult<Raster>>;
}

/// Decodes PNG snapshots in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngDecoder;

impl SnapshotDecoder for PngDecoder {
    fn decode(&self, snapshot: Snapshot) -> BoxFuture<'static, RenderResult<Raster>> {
        Box::pin(async move { decode_png(&snapshot) })
    }
}

struct PendingBlit {
    generation: u64,
    decode: BoxFuture<'static, RenderResult<Raster>>,
}

/// Single-slot, latest-wins holder for the in-flight restore.
///
/// A new request drops the older future, so a superseded decode can never
/// write to the raster.
#[derive(Default)]
pub struct BlitSlot {
    pending: Option<PendingBlit>,
    generation: u64,
}

impl BlitSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a restore, replacing any pending one. Returns its generation.
    pub fn request(&mut self, decode: BoxFuture<'static, RenderResult<Raster>>) -> u64 {
        self.generation += 1;
        if let Some(old) = self.pending.take() {
            log::debug!(
                "Restore {} superseded by {}",
                old.generation,
                self.generation
            );
        }
        self.pending = Some(PendingBlit {
            generation: self.generation,
            decode,
        });
        self.generation
    }

    /// Drop the pending restore, if any.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(old) => {
                log::debug!("Restore {} cancelled", old.generation);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drive the pending decode. `Ready(None)` when nothing is pending.
    pub fn poll(&mut self, cx: &mut Context<'_>) -> Poll<Option<(u64, RenderResult<Raster>)>> {
        let Some(pending) = self.pending.as_mut() else {
            return Poll::Ready(None);
        };
        match pending.decode.as_mut().poll(cx) {
            Poll::Ready(result) => {
                let generation = pending.generation;
                self.pending = None;
                Poll::Ready(Some((generation, result)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
