//! Renderer abstractions.

use crate::raster::Raster;
use crate::rasterize::{fill_path, stroke_path};
use kurbo::{BezPath, Point, Rect};
use sketchpad_core::Rgba;
use sketchpad_core::shapes::{PathOp, ShapeGeometry};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Drawing primitives used by the tools.
pub trait ShapeRenderer {
    /// Paint every operation of `geometry` in `color`.
    fn render_geometry(&mut self, geometry: &ShapeGeometry, color: Rgba);

    /// Stroke one segment with round caps.
    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba);
}

impl ShapeRenderer for Raster {
    fn render_geometry(&mut self, geometry: &ShapeGeometry, color: Rgba) {
        let canvas = Rect::from_origin_size(Point::ZERO, self.size());
        if !geometry.bounds().inflate(1.0, 1.0).overlaps(canvas) {
            log::trace!("Geometry outside the canvas skipped");
            return;
        }
        for op in &geometry.ops {
            match op {
                PathOp::Stroke(path) => stroke_path(self, path, geometry.stroke_width, color),
                PathOp::Fill(path) => fill_path(self, path, color),
            }
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        stroke_path(self, &path, width, color);
    }
}

/// Per-gesture rendering strategy.
///
/// Created on pointer-down with the tool style captured, advanced on every
/// pointer-move and finished on pointer-up or cancel.
pub trait GestureStrategy {
    /// Render the gesture up to `to` (logical coordinates).
    fn advance(&mut self, raster: &mut Raster, to: Point);

    /// End the gesture, leaving the raster as it is.
    fn finish(&mut self, _raster: &mut Raster) {}

    /// Whether any move reached the strategy.
    fn has_moved(&self) -> bool;
}
