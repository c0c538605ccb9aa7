//! Rasterization and raster extraction.
//!
//! The [`Rasterizer`] trait is the seam to the vector-rasterization
//! collaborator: it accepts a composited [`TileDocument`] and returns pixel
//! data of matching dimensions. [`SkiaRasterizer`] is the default
//! implementation. Extraction ([`extract`]) crops the raster to the
//! configured window and [`RenderedTile::encode_png`] produces the final
//! compressed image bytes.
//!
//! A rasterizer instance is a scoped resource: construct it once per worker
//! before processing begins and let it drop after the last tile, so release
//! happens exactly once on every exit path.

mod extract;
mod skia;

pub use extract::{extract, CropWindow, ExtractError, RenderedTile};
pub use skia::SkiaRasterizer;

use crate::render::TileDocument;
use thiserror::Error;

/// Errors that can occur during rasterization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The canvas dimensions cannot back a pixel buffer
    #[error("cannot allocate {width}x{height} raster canvas")]
    InvalidCanvas { width: u32, height: u32 },
}

/// A raster produced by the rasterizer: straight (non-premultiplied) RGBA8
/// pixels, row-major, matching the document's declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wraps a pixel buffer; `pixels.len()` must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// The vector-rasterization collaborator.
///
/// Implementations render a composited tile document into a raster of the
/// document's dimensions. Construction starts the collaborator; dropping it
/// releases it.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, document: &TileDocument) -> Result<Raster, RasterError>;
}
