//! Oval tool.

use super::{PATH_TOLERANCE, ShapeGeometry, ShapeTrait};
use kurbo::{Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};

/// Axis-aligned ellipse inscribed in the drag box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oval {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Oval {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    /// Radii are half the absolute width and height of the drag box.
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self::new(
            start.midpoint(end),
            ((end.x - start.x) / 2.0).abs(),
            ((end.y - start.y) / 2.0).abs(),
        )
    }

    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Oval {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    fn geometry(&self, stroke_width: f64) -> ShapeGeometry {
        ShapeGeometry::stroked(self.as_kurbo().to_path(PATH_TOLERANCE), stroke_width)
    }
}
