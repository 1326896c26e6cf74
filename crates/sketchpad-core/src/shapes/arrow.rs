//! Arrow tool: a line with a filled triangular head.

use super::{ShapeGeometry, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use std::f64::consts::PI;

/// Length of each side of the arrow head, in logical pixels.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

/// Angle between the shaft and each side of the head (30°).
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// An arrow pointing from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    /// Length of the head sides.
    pub head_size: f64,
}

impl Arrow {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            head_size: ARROW_HEAD_LENGTH,
        }
    }

    /// Direction of the shaft in radians; `0` when both points coincide.
    pub fn angle(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// The two back corners of the head.
    pub fn head_vertices(&self) -> [Point; 2] {
        let angle = self.angle();
        let side = |a: f64| self.end - Vec2::new(a.cos(), a.sin()) * self.head_size;
        [side(angle - ARROW_HEAD_ANGLE), side(angle + ARROW_HEAD_ANGLE)]
    }

    fn shaft(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn head(&self) -> BezPath {
        let [left, right] = self.head_vertices();
        let mut path = BezPath::new();
        path.move_to(self.end);
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }
}

impl ShapeTrait for Arrow {
    fn bounds(&self) -> Rect {
        let [left, right] = self.head_vertices();
        Rect::from_points(self.start, self.end)
            .union_pt(left)
            .union_pt(right)
    }

    fn geometry(&self, stroke_width: f64) -> ShapeGeometry {
        let mut geometry = ShapeGeometry::stroked(self.shaft(), stroke_width);
        // The head is always filled in the stroke color.
        geometry.push_fill(self.head());
        geometry
    }
}
