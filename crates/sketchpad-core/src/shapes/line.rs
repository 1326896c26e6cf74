//! Straight line tool.

use super::{ShapeGeometry, ShapeTrait};
use kurbo::{BezPath, Point, Rect};

/// A single segment from the drag start to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }
}

impl ShapeTrait for Line {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn geometry(&self, stroke_width: f64) -> ShapeGeometry {
        ShapeGeometry::stroked(self.to_path(), stroke_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::PathOp;
    use kurbo::PathEl;

    #[test]
    fn test_single_segment() {
        let line = Line::new(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        assert!((line.length() - 5.0).abs() < f64::EPSILON);

        let geometry = line.geometry(3.0);
        assert_eq!(geometry.stroke_width, 3.0);
        assert_eq!(geometry.ops.len(), 1);
        let PathOp::Stroke(path) = &geometry.ops[0] else {
            panic!("line must be stroked");
        };
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(1.0, 2.0)),
                PathEl::LineTo(Point::new(4.0, 6.0)),
            ]
        );
    }

    #[test]
    fn test_bounds_any_direction() {
        let line = Line::new(Point::new(50.0, 10.0), Point::new(10.0, 40.0));
        assert_eq!(line.bounds(), Rect::new(10.0, 10.0, 50.0, 40.0));
    }
}
