//! Freehand pen and eraser strokes.

use crate::raster::Raster;
use crate::renderer::{GestureStrategy, ShapeRenderer};
use kurbo::Point;
use sketchpad_core::Rgba;

/// Lays ink down incrementally, one segment per move.
///
/// Color and width are fixed when the gesture starts; the eraser is simply a
/// stroke in the background color at three times the width.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    last: Point,
    color: Rgba,
    width: f64,
    segments: usize,
}

impl StrokeRenderer {
    pub fn new(start: Point, color: Rgba, width: f64) -> Self {
        Self {
            last: start,
            color,
            width,
            segments: 0,
        }
    }

    /// Number of segments drawn so far.
    pub fn segments(&self) -> usize {
        self.segments
    }
}

impl GestureStrategy for StrokeRenderer {
    fn advance(&mut self, raster: &mut Raster, to: Point) {
        raster.stroke_segment(self.last, to, self.width, self.color);
        self.last = to;
        self.segments += 1;
    }

    fn finish(&mut self, _raster: &mut Raster) {
        log::debug!("Stroke finished after {} segments", self.segments);
    }

    fn has_moved(&self) -> bool {
        self.segments > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_down_alone_draws_nothing() {
        let raster = Raster::new(10, 10, Rgba::white());
        let stroke = StrokeRenderer::new(Point::new(5.0, 5.0), Rgba::black(), 2.0);
        assert!(!stroke.has_moved());
        assert!(raster.is_uniform(Rgba::white()));
    }

    #[test]
    fn test_segments_connect() {
        let mut raster = Raster::new(40, 40, Rgba::white());
        let mut stroke = StrokeRenderer::new(Point::new(5.5, 5.5), Rgba::black(), 2.0);
        stroke.advance(&mut raster, Point::new(30.5, 5.5));
        stroke.advance(&mut raster, Point::new(30.5, 30.5));
        for x in 5..=30 {
            assert_eq!(raster.pixel(x, 5), Some(Rgba::black()), "gap at x={x}");
        }
        for y in 5..=30 {
            assert_eq!(raster.pixel(30, y), Some(Rgba::black()), "gap at y={y}");
        }
        assert_eq!(raster.pixel(15, 20), Some(Rgba::white()));
        assert_eq!(stroke.segments(), 2);
    }

    #[test]
    fn test_eraser_width() {
        let mut raster = Raster::new(100, 100, Rgba::black());
        // Width 4 tripled.
        let mut eraser = StrokeRenderer::new(Point::new(50.0, 0.0), Rgba::white(), 12.0);
        eraser.advance(&mut raster, Point::new(50.0, 100.0));
        let erased = (0..100)
            .filter(|&x| raster.pixel(x, 50) == Some(Rgba::white()))
            .count();
        assert_eq!(erased, 12);
    }
}
