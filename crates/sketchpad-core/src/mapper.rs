//! Display-space to canvas-space coordinate mapping.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Map a pointer position in display space onto the canvas' logical pixels.
///
/// The horizontal and vertical scale factors are independent, so a canvas
/// stretched by responsive CSS still maps correctly. Points outside the
/// display rect are passed through unclamped.
pub fn map_to_logical(pointer: Point, display: Rect, logical: Size) -> Point {
    let scale = axis_scale(display, logical);
    Point::new(
        (pointer.x - display.x0) * scale.x,
        (pointer.y - display.y0) * scale.y,
    )
}

/// `logical / display` per axis. A collapsed axis maps 1:1.
fn axis_scale(display: Rect, logical: Size) -> Vec2 {
    let sx = if display.width() > 0.0 {
        logical.width / display.width()
    } else {
        1.0
    };
    let sy = if display.height() > 0.0 {
        logical.height / display.height()
    } else {
        1.0
    };
    Vec2::new(sx, sy)
}

/// Holds the canvas' current on-screen rect and its logical size.
///
/// The host updates the display rect whenever layout changes; the engine maps
/// every pointer event through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    /// Canvas bounding rect in display coordinates.
    pub display_rect: Rect,
    /// Canvas size in logical pixels.
    pub logical_size: Size,
}

impl CoordinateMapper {
    /// Create a mapper whose display rect matches the logical size at the origin.
    pub fn new(logical_size: Size) -> Self {
        Self {
            display_rect: Rect::from_origin_size(Point::ZERO, logical_size),
            logical_size,
        }
    }

    /// Update the on-screen rect.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display_rect = rect;
    }

    /// Convert a display point to logical canvas coordinates.
    pub fn to_logical(&self, pointer: Point) -> Point {
        map_to_logical(pointer, self.display_rect, self.logical_size)
    }
}
