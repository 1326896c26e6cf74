//! PNG snapshot encoding and image decoding.

use crate::raster::Raster;
use crate::renderer::{RenderResult, RendererError};
use image::{ImageFormat, RgbaImage};
use sketchpad_core::Snapshot;

/// Encode the raster as an RGBA8 PNG snapshot.
pub fn encode_png(raster: &Raster) -> RenderResult<Snapshot> {
    let (width, height) = raster.dimensions();
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(|e| {
            log::error!("Failed to write PNG header: {:?}", e);
            RendererError::Encode(e.to_string())
        })?;
        writer.write_image_data(raster.as_raw()).map_err(|e| {
            log::error!("Failed to write PNG data: {:?}", e);
            RendererError::Encode(e.to_string())
        })?;
        writer
            .finish()
            .map_err(|e| RendererError::Encode(e.to_string()))?;
    }
    Ok(Snapshot::from_png_bytes(png_data))
}

/// Decode a PNG snapshot back into a raster.
pub fn decode_png(snapshot: &Snapshot) -> RenderResult<Raster> {
    let image = image::load_from_memory_with_format(snapshot.as_bytes(), ImageFormat::Png)
        .map_err(|e| RendererError::Decode(e.to_string()))?;
    Ok(Raster::from_image(image.into_rgba8()))
}

/// Decode an image in any supported format (PNG, JPEG, WebP).
pub fn decode_image(bytes: &[u8]) -> RenderResult<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(|e| RendererError::Decode(e.to_string()))?;
    log::debug!("Decoded {}x{} image", image.width(), image.height());
    Ok(image.into_rgba8())
}
