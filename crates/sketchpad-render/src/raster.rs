//! CPU pixel buffer backing the drawing surface.

use crate::renderer::{RenderResult, RendererError};
use image::imageops::{self, FilterType};
use image::{Rgba as Pixel, RgbaImage};
use kurbo::Size;
use sketchpad_core::Rgba;
use std::fmt;

/// RGBA8 pixel buffer at the canvas logical size.
#[derive(Clone, PartialEq)]
pub struct Raster {
    image: RgbaImage,
}

/// Raw pixel copy used as the base of a shape preview.
///
/// Unlike a snapshot it is not encoded, so taking and restoring one is a
/// plain memory copy.
#[derive(Clone)]
pub struct PixelCopy {
    image: RgbaImage,
}

impl PixelCopy {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

fn to_pixel(color: Rgba) -> Pixel<u8> {
    Pixel(color.to_array())
}

impl Raster {
    /// A `width` x `height` raster filled with `color`.
    pub fn new(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, to_pixel(color)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image.get_pixel_checked(x, y).map(|p| Rgba::from_array(p.0))
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        let pixel = to_pixel(color);
        self.image.pixels_mut().for_each(|p| *p = pixel);
    }

    /// Whether every pixel equals `color`.
    pub fn is_uniform(&self, color: Rgba) -> bool {
        let pixel = to_pixel(color);
        self.image.pixels().all(|p| *p == pixel)
    }

    pub fn copy_pixels(&self) -> PixelCopy {
        PixelCopy {
            image: self.image.clone(),
        }
    }

    /// Overwrite the raster with a copy taken earlier.
    pub fn restore(&mut self, copy: &PixelCopy) -> RenderResult<()> {
        self.check_size(copy.image.dimensions())?;
        self.image.copy_from_slice(copy.image.as_raw());
        Ok(())
    }

    /// Replace the whole raster with a decoded one of the same size.
    pub fn replace_with(&mut self, other: Raster) -> RenderResult<()> {
        self.check_size(other.dimensions())?;
        self.image = other.image;
        Ok(())
    }

    /// Scale `image` to the raster size and draw it over the current pixels.
    pub fn draw_image_scaled(&mut self, image: &RgbaImage) {
        let (width, height) = self.dimensions();
        let scaled;
        let source = if image.dimensions() == (width, height) {
            image
        } else {
            scaled = imageops::resize(image, width, height, FilterType::Triangle);
            &scaled
        };
        for (dst, src) in self.image.pixels_mut().zip(source.pixels()) {
            *dst = blend(*dst, Rgba::from_array(src.0), 1.0);
        }
    }

    /// Source-over blend of `color` scaled by `coverage` into one pixel.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        if coverage <= 0.0 || x >= self.width() || y >= self.height() {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        *dst = blend(*dst, color, coverage.min(1.0));
    }

    fn check_size(&self, actual: (u32, u32)) -> RenderResult<()> {
        let expected = self.dimensions();
        if expected != actual {
            return Err(RendererError::SizeMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Straight-alpha source-over.
fn blend(dst: Pixel<u8>, color: Rgba, coverage: f32) -> Pixel<u8> {
    let sa = f32::from(color.a) / 255.0 * coverage;
    if sa >= 1.0 {
        return to_pixel(color);
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Pixel([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Pixel([
        channel(color.r, dst[0]),
        channel(color.g, dst[1]),
        channel(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
