//! Anti-aliased scan conversion of strokes and fills.
//!
//! Coverage comes from the distance of each pixel center to the path: a
//! stroke covers pixels within half its width (which yields round caps and
//! joins for free), a fill covers pixels inside under the non-zero rule.
//! Both fade out over one pixel at the edge.

use crate::raster::Raster;
use kurbo::{BezPath, PathEl, Point, Rect};
use sketchpad_core::Rgba;
use sketchpad_core::shapes::{PATH_TOLERANCE, point_to_segment_dist};

/// A flattened subpath.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    /// Segments of the polyline, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if first != last => Some((last, first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }
}

/// Flatten a path into polylines.
pub fn flatten(path: &BezPath) -> Vec<Polyline> {
    let mut polylines: Vec<Polyline> = Vec::new();
    let mut current: Option<Polyline> = None;
    kurbo::flatten(path.iter(), PATH_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            polylines.extend(current.take());
            current = Some(Polyline {
                points: vec![p],
                closed: false,
            });
        }
        PathEl::LineTo(p) => {
            if let Some(polyline) = current.as_mut() {
                polyline.points.push(p);
            }
        }
        PathEl::ClosePath => {
            if let Some(mut polyline) = current.take() {
                polyline.closed = true;
                polylines.push(polyline);
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    polylines.extend(current);
    polylines
}

/// Per-pixel coverage over a clipped window of the raster.
#[derive(Debug, Clone)]
pub struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl CoverageMask {
    /// Mask covering `area` clipped to a `canvas_w` x `canvas_h` raster.
    fn for_area(area: Rect, canvas_w: u32, canvas_h: u32) -> Self {
        let x0 = area.x0.floor().clamp(0.0, f64::from(canvas_w)) as u32;
        let y0 = area.y0.floor().clamp(0.0, f64::from(canvas_h)) as u32;
        let x1 = area.x1.ceil().clamp(0.0, f64::from(canvas_w)) as u32;
        let y1 = area.y1.ceil().clamp(0.0, f64::from(canvas_h)) as u32;
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        Self {
            x0,
            y0,
            width,
            height,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    /// Coverage at raster coordinates, zero outside the window.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x < self.x0 || y < self.y0 || x >= self.x0 + self.width || y >= self.y0 + self.height {
            return 0.0;
        }
        self.values[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y - self.y0) as usize * self.width as usize + (x - self.x0) as usize
    }

    /// Pixel window intersecting `area`, in raster coordinates.
    fn window(&self, area: Rect) -> (u32, u32, u32, u32) {
        let x_end = self.x0 + self.width;
        let y_end = self.y0 + self.height;
        let clamp = |v: f64, lo: u32, hi: u32| v.clamp(f64::from(lo), f64::from(hi)) as u32;
        (
            clamp(area.x0.floor(), self.x0, x_end),
            clamp(area.y0.floor(), self.y0, y_end),
            clamp(area.x1.ceil(), self.x0, x_end),
            clamp(area.y1.ceil(), self.y0, y_end),
        )
    }

    /// Blend `color` into the raster once per covered pixel.
    pub fn composite(&self, raster: &mut Raster, color: Rgba) {
        for row in 0..self.height {
            for col in 0..self.width {
                let coverage = self.values[row as usize * self.width as usize + col as usize];
                if coverage > 0.001 {
                    raster.blend_pixel(self.x0 + col, self.y0 + row, color, coverage);
                }
            }
        }
    }
}

fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

/// Coverage of a stroke of `width` along `polylines`.
pub fn stroke_coverage(polylines: &[Polyline], width: f64, canvas_w: u32, canvas_h: u32) -> CoverageMask {
    let half = width.max(0.0) / 2.0;
    let reach = half + 0.5;
    let area = bounds_of(polylines).inflate(reach, reach);
    let mut mask = CoverageMask::for_area(area, canvas_w, canvas_h);

    for polyline in polylines {
        let segments: Vec<(Point, Point)> = match polyline.points.as_slice() {
            [] => Vec::new(),
            // A lone point still paints a round dot.
            [only] => vec![(*only, *only)],
            _ => polyline.segments().collect(),
        };
        for (a, b) in segments {
            let seg_area = Rect::from_points(a, b).inflate(reach, reach);
            let (x0, y0, x1, y1) = mask.window(seg_area);
            for y in y0..y1 {
                for x in x0..x1 {
                    let d = point_to_segment_dist(pixel_center(x, y), a, b);
                    let coverage = (half + 0.5 - d).clamp(0.0, 1.0) as f32;
                    let idx = mask.index(x, y);
                    if coverage > mask.values[idx] {
                        mask.values[idx] = coverage;
                    }
                }
            }
        }
    }
    mask
}

/// Coverage of the interior of `polylines` under the non-zero winding rule.
/// Every subpath is treated as closed.
pub fn fill_coverage(polylines: &[Polyline], canvas_w: u32, canvas_h: u32) -> CoverageMask {
    let edges: Vec<(Point, Point)> = polylines
        .iter()
        .flat_map(|polyline| {
            let closed = Polyline {
                points: polyline.points.clone(),
                closed: true,
            };
            closed.segments().collect::<Vec<_>>()
        })
        .collect();

    let area = bounds_of(polylines).inflate(1.0, 1.0);
    let mut mask = CoverageMask::for_area(area, canvas_w, canvas_h);
    if mask.values.is_empty() || edges.is_empty() {
        return mask;
    }

    // Distance to the nearest edge, only tracked within a pixel of it.
    let mut distance = vec![f64::INFINITY; mask.values.len()];
    for &(a, b) in &edges {
        let (x0, y0, x1, y1) = mask.window(Rect::from_points(a, b).inflate(1.0, 1.0));
        for y in y0..y1 {
            for x in x0..x1 {
                let d = point_to_segment_dist(pixel_center(x, y), a, b);
                let idx = mask.index(x, y);
                distance[idx] = distance[idx].min(d);
            }
        }
    }

    for row in 0..mask.height {
        let y = mask.y0 + row;
        let crossings = winding_crossings(&edges, f64::from(y) + 0.5);
        for col in 0..mask.width {
            let x = mask.x0 + col;
            let cx = f64::from(x) + 0.5;
            let winding: i32 = crossings
                .iter()
                .filter(|(crossing_x, _)| *crossing_x < cx)
                .map(|(_, dir)| dir)
                .sum();
            let idx = mask.index(x, y);
            let d = distance[idx];
            let coverage = if winding != 0 {
                (0.5 + d).min(1.0)
            } else {
                (0.5 - d).max(0.0)
            };
            mask.values[idx] = coverage as f32;
        }
    }
    mask
}

/// X positions where edges cross the horizontal line at `y`, with direction.
fn winding_crossings(edges: &[(Point, Point)], y: f64) -> Vec<(f64, i32)> {
    edges
        .iter()
        .filter_map(|&(a, b)| {
            let (dir, lo, hi) = if a.y < b.y {
                (1, a, b)
            } else if a.y > b.y {
                (-1, b, a)
            } else {
                return None;
            };
            // Half-open so shared vertices are counted once.
            if y < lo.y || y >= hi.y {
                return None;
            }
            let t = (y - lo.y) / (hi.y - lo.y);
            Some((lo.x + t * (hi.x - lo.x), dir))
        })
        .collect()
}

fn bounds_of(polylines: &[Polyline]) -> Rect {
    polylines
        .iter()
        .flat_map(|p| p.points.iter())
        .map(|&p| Rect::from_points(p, p))
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

/// Stroke `path` onto the raster.
pub fn stroke_path(raster: &mut Raster, path: &BezPath, width: f64, color: Rgba) {
    let (w, h) = raster.dimensions();
    stroke_coverage(&flatten(path), width, w, h).composite(raster, color);
}

/// Fill `path` onto the raster.
pub fn fill_path(raster: &mut Raster, path: &BezPath, color: Rgba) {
    let (w, h) = raster.dimensions();
    fill_coverage(&flatten(path), w, h).composite(raster, color);
}
