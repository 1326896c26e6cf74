//! Diamond (flowchart decision) tool.

use super::{ShapeGeometry, ShapeTrait};
use kurbo::{BezPath, Point, Rect};

/// Quadrilateral through the edge midpoints of the drag box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diamond {
    pub start: Point,
    pub end: Point,
}

impl Diamond {
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Top, right, bottom and left vertices, relative to the drag direction.
    pub fn vertices(&self) -> [Point; 4] {
        let center = self.start.midpoint(self.end);
        [
            Point::new(center.x, self.start.y),
            Point::new(self.end.x, center.y),
            Point::new(center.x, self.end.y),
            Point::new(self.start.x, center.y),
        ]
    }
}

impl ShapeTrait for Diamond {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn geometry(&self, stroke_width: f64) -> ShapeGeometry {
        let [top, right, bottom, left] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(top);
        path.line_to(right);
        path.line_to(bottom);
        path.line_to(left);
        path.close_path();
        ShapeGeometry::stroked(path, stroke_width)
    }
}
