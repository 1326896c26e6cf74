//! Sketchpad Render Library
//!
//! CPU raster for the drawing surface: anti-aliased strokes and fills, the
//! pen/eraser and shape preview strategies, and PNG snapshot encoding.

pub mod codec;
mod preview;
mod raster;
pub mod rasterize;
mod renderer;
mod stroke;

pub use codec::{decode_image, decode_png, encode_png};
pub use preview::ShapePreview;
pub use raster::{PixelCopy, Raster};
pub use renderer::{GestureStrategy, RenderResult, RendererError, ShapeRenderer};
pub use stroke::StrokeRenderer;
