//! Raster cropping and PNG extraction.
//!
//! A [`CropWindow`] selects the rectangle of the rasterized canvas that is
//! written out: either the full canvas, or the vertical span of the
//! projected features (trimming whitespace above and below a feature
//! cluster that does not span the whole tile).

use super::Raster;
use crate::config::RenderSpec;
use crate::projection::PixelBounds;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during raster extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The feature-bounds crop had no features to bound
    #[error("feature-bounds crop requires at least one feature")]
    EmptyCrop,

    /// The crop window collapsed to zero height or fell outside the canvas
    #[error("crop window {top}..{bottom} is empty or outside the {height}px canvas")]
    DegenerateWindow { top: u32, bottom: u32, height: u32 },

    /// The crop rectangle exceeds the raster
    #[error("crop {left},{top} {width}x{height} exceeds raster {raster_width}x{raster_height}")]
    OutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        raster_width: u32,
        raster_height: u32,
    },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// The rectangle extracted from the rasterized canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    /// The entire canvas.
    pub fn full_canvas(spec: &RenderSpec) -> Self {
        Self {
            left: 0,
            top: 0,
            width: spec.canvas_width,
            height: spec.canvas_height,
        }
    }

    /// The vertical span of the projected feature bounds, full canvas width.
    ///
    /// The top edge is the floor of the smallest projected `y`, clamped at
    /// zero; the bottom edge is the floor of the largest projected `y`,
    /// clamped to the canvas height. A span that collapses (features
    /// entirely above or below the canvas) is an error.
    pub fn feature_bounds(bounds: &PixelBounds, spec: &RenderSpec) -> Result<Self, ExtractError> {
        let top = bounds.y0.floor().max(0.0) as u32;
        let bottom = (bounds.y1.floor().max(0.0) as u32).min(spec.canvas_height);
        if bottom <= top {
            return Err(ExtractError::DegenerateWindow {
                top,
                bottom,
                height: spec.canvas_height,
            });
        }
        Ok(Self {
            left: 0,
            top,
            width: spec.canvas_width,
            height: bottom - top,
        })
    }
}

/// A cropped raster together with the window that produced it.
#[derive(Debug, Clone)]
pub struct RenderedTile {
    pub image: RgbaImage,
    pub window: CropWindow,
}

impl RenderedTile {
    /// Encodes the cropped raster as PNG bytes.
    ///
    /// PNG encoding is deterministic: identical pixels yield identical
    /// bytes, so re-running a pipeline over unchanged inputs reproduces
    /// output files exactly.
    pub fn encode_png(&self) -> Result<Vec<u8>, ExtractError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Extracts exactly the crop window from a raster.
pub fn extract(raster: &Raster, window: &CropWindow) -> Result<RenderedTile, ExtractError> {
    let within_width = window.left.checked_add(window.width).map(|right| right <= raster.width());
    let within_height = window.top.checked_add(window.height).map(|bottom| bottom <= raster.height());
    if within_width != Some(true) || within_height != Some(true) {
        return Err(ExtractError::OutOfBounds {
            left: window.left,
            top: window.top,
            width: window.width,
            height: window.height,
            raster_width: raster.width(),
            raster_height: raster.height(),
        });
    }

    let source = raster.pixels();
    let source_stride = (raster.width() * 4) as usize;
    let row_bytes = (window.width * 4) as usize;
    let mut cropped = Vec::with_capacity(row_bytes * window.height as usize);
    for row in 0..window.height {
        let offset = ((window.top + row) as usize) * source_stride + (window.left as usize) * 4;
        cropped.extend_from_slice(&source[offset..offset + row_bytes]);
    }

    let image = RgbaImage::from_raw(window.width, window.height, cropped)
        .expect("crop buffer matches window dimensions");

    Ok(RenderedTile {
        image,
        window: *window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: u32, height: u32) -> RenderSpec {
        RenderSpec {
            canvas_width: width,
            canvas_height: height,
        }
    }

    fn bounds(y0: f64, y1: f64) -> PixelBounds {
        PixelBounds {
            x0: 0.0,
            y0,
            x1: 256.0,
            y1,
        }
    }

    #[test]
    fn test_full_canvas_window() {
        let window = CropWindow::full_canvas(&spec(256, 256));
        assert_eq!(
            window,
            CropWindow {
                left: 0,
                top: 0,
                width: 256,
                height: 256
            }
        );
    }

    #[test]
    fn test_feature_bounds_window_trims_vertical_whitespace() {
        let window = CropWindow::feature_bounds(&bounds(40.0, 200.0), &spec(256, 256)).unwrap();
        assert_eq!(window.top, 40);
        assert_eq!(window.height, 160);
        assert_eq!(window.left, 0);
        assert_eq!(window.width, 256);
    }

    #[test]
    fn test_feature_bounds_window_clamps_negative_top() {
        let window = CropWindow::feature_bounds(&bounds(-10.0, 100.0), &spec(256, 256)).unwrap();
        assert_eq!(window.top, 0);
        assert_eq!(window.height, 100);
    }

    #[test]
    fn test_feature_bounds_window_clamps_bottom_to_canvas() {
        let window = CropWindow::feature_bounds(&bounds(200.0, 400.0), &spec(256, 256)).unwrap();
        assert_eq!(window.top, 200);
        assert_eq!(window.height, 56);
    }

    #[test]
    fn test_feature_bounds_window_rounds_fractional_edges_down() {
        let window = CropWindow::feature_bounds(&bounds(40.7, 200.9), &spec(256, 256)).unwrap();
        assert_eq!(window.top, 40);
        assert_eq!(window.height, 160);
    }

    #[test]
    fn test_collapsed_window_is_rejected() {
        let result = CropWindow::feature_bounds(&bounds(-50.0, -10.0), &spec(256, 256));
        assert!(matches!(
            result,
            Err(ExtractError::DegenerateWindow { top: 0, bottom: 0, .. })
        ));
    }

    #[test]
    fn test_extract_copies_the_requested_rows() {
        // 4x4 raster: row y has every byte set to y.
        let mut pixels = Vec::new();
        for y in 0..4u8 {
            pixels.extend(std::iter::repeat(y).take(16));
        }
        let raster = Raster::from_rgba(4, 4, pixels);

        let tile = extract(
            &raster,
            &CropWindow {
                left: 0,
                top: 1,
                width: 4,
                height: 2,
            },
        )
        .unwrap();

        assert_eq!(tile.image.dimensions(), (4, 2));
        assert!(tile.image.as_raw()[..16].iter().all(|&b| b == 1));
        assert!(tile.image.as_raw()[16..].iter().all(|&b| b == 2));
    }

    #[test]
    fn test_extract_rejects_out_of_bounds_window() {
        let raster = Raster::from_rgba(4, 4, vec![0; 64]);
        let result = extract(
            &raster,
            &CropWindow {
                left: 2,
                top: 0,
                width: 4,
                height: 4,
            },
        );
        assert!(matches!(result, Err(ExtractError::OutOfBounds { .. })));
    }

    #[test]
    fn test_png_round_trips_through_codec() {
        let raster = Raster::from_rgba(2, 2, vec![255; 16]);
        let tile = extract(&raster, &CropWindow::full_canvas(&spec(2, 2))).unwrap();

        let bytes = tile.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert!(decoded.as_raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_png_encoding_is_deterministic() {
        let raster = Raster::from_rgba(2, 2, (0..16).collect());
        let tile = extract(&raster, &CropWindow::full_canvas(&spec(2, 2))).unwrap();
        assert_eq!(tile.encode_png().unwrap(), tile.encode_png().unwrap());
    }
}
