//! Shape placement preview.

use crate::raster::{PixelCopy, Raster};
use crate::renderer::{GestureStrategy, ShapeRenderer};
use kurbo::Point;
use sketchpad_core::{Rgba, ShapeKind};

/// Restore-then-redraw loop for a shape being dragged.
///
/// A raw copy of the raster is taken when the gesture starts. Every move
/// restores that copy and draws the candidate for `(start, current)`, so
/// exactly one candidate is ever visible. The copy never enters history.
pub struct ShapePreview {
    kind: ShapeKind,
    start: Point,
    color: Rgba,
    width: f64,
    base: Option<PixelCopy>,
    moved: bool,
}

impl ShapePreview {
    /// Start previewing, capturing the current pixels as the base.
    pub fn begin(raster: &Raster, kind: ShapeKind, start: Point, color: Rgba, width: f64) -> Self {
        Self {
            kind,
            start,
            color,
            width,
            base: Some(raster.copy_pixels()),
            moved: false,
        }
    }
}

impl GestureStrategy for ShapePreview {
    fn advance(&mut self, raster: &mut Raster, to: Point) {
        let Some(base) = &self.base else {
            return;
        };
        if let Err(e) = raster.restore(base) {
            log::error!("Preview base no longer matches the canvas: {}", e);
            return;
        }
        let geometry = self.kind.geometry(self.start, to, self.width);
        raster.render_geometry(&geometry, self.color);
        self.moved = true;
    }

    fn finish(&mut self, _raster: &mut Raster) {
        self.base = None;
        log::debug!("{:?} placed (moved: {})", self.kind, self.moved);
    }

    fn has_moved(&self) -> bool {
        self.moved
    }
}
