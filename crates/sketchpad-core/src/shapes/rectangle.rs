//! Rectangle tool.

use super::{PATH_TOLERANCE, ShapeGeometry, ShapeTrait};
use kurbo::{Point, Rect, Shape as KurboShape};

/// Axis-aligned box spanned by the drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Drag start corner.
    pub position: Point,
    /// Signed width; negative when dragging leftwards.
    pub width: f64,
    /// Signed height; negative when dragging upwards.
    pub height: f64,
}

impl Rectangle {
    /// Rectangle with origin and signed extents.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, in either order.
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self::new(start, end.x - start.x, end.y - start.y)
    }

    /// Normalized rect regardless of the signs of the extents.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(
            self.position,
            Point::new(self.position.x + self.width, self.position.y + self.height),
        )
    }
}

impl ShapeTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn geometry(&self, stroke_width: f64) -> ShapeGeometry {
        ShapeGeometry::stroked(self.as_rect().to_path(PATH_TOLERANCE), stroke_width)
    }
}
