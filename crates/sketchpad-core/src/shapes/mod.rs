//! Geometry for the shape tools.
//!
//! Every shape is built from the two points of a drag gesture and produces a
//! [`ShapeGeometry`]: the list of paths a renderer strokes or fills. All
//! constructors are total, including `start == end`.

mod arrow;
mod diamond;
mod line;
mod oval;
mod rectangle;

pub use arrow::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, Arrow};
pub use diamond::Diamond;
pub use line::Line;
pub use oval::Oval;
pub use rectangle::Rectangle;

use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Tolerance used when converting curves to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// A single drawing operation of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOp {
    /// Outline the path with round caps and joins.
    Stroke(BezPath),
    /// Fill the path's interior (non-zero winding).
    Fill(BezPath),
}

impl PathOp {
    pub fn path(&self) -> &BezPath {
        match self {
            PathOp::Stroke(path) | PathOp::Fill(path) => path,
        }
    }
}

/// Paths making up one rendered shape, all painted in the stroke color.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    /// Width used for [`PathOp::Stroke`] operations.
    pub stroke_width: f64,
    /// Operations in paint order.
    pub ops: Vec<PathOp>,
}

impl ShapeGeometry {
    /// Geometry consisting of one stroked path.
    pub fn stroked(path: BezPath, stroke_width: f64) -> Self {
        Self {
            stroke_width,
            ops: vec![PathOp::Stroke(path)],
        }
    }

    pub fn push_fill(&mut self, path: BezPath) {
        self.ops.push(PathOp::Fill(path));
    }

    /// Area that rendering may touch, including the stroke half-width.
    pub fn bounds(&self) -> Rect {
        let half = self.stroke_width / 2.0;
        self.ops
            .iter()
            .map(|op| match op {
                PathOp::Stroke(path) => path.bounding_box().inflate(half, half),
                PathOp::Fill(path) => path.bounding_box(),
            })
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}

/// Common behaviour of the shape tools.
pub trait ShapeTrait {
    /// Bounding box of the outline itself (without stroke width).
    fn bounds(&self) -> Rect;

    /// Paths to paint for the given stroke width.
    fn geometry(&self, stroke_width: f64) -> ShapeGeometry;
}

/// The shape tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Arrow,
    Rectangle,
    Diamond,
    Oval,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Rectangle,
        ShapeKind::Diamond,
        ShapeKind::Oval,
    ];

    /// Geometry for a drag from `start` to `end`.
    pub fn geometry(self, start: Point, end: Point, stroke_width: f64) -> ShapeGeometry {
        match self {
            ShapeKind::Line => Line::new(start, end).geometry(stroke_width),
            ShapeKind::Arrow => Arrow::new(start, end).geometry(stroke_width),
            ShapeKind::Rectangle => Rectangle::from_corners(start, end).geometry(stroke_width),
            ShapeKind::Diamond => Diamond::from_corners(start, end).geometry(stroke_width),
            ShapeKind::Oval => Oval::from_corners(start, end).geometry(stroke_width),
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}
