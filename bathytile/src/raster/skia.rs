//! tiny-skia rasterizer implementation.

use super::{Raster, RasterError, Rasterizer};
use crate::color::Color;
use crate::render::{PathElement, PathFragment, TileDocument};
use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, Shader, Stroke, Transform,
};

/// Default [`Rasterizer`] backed by tiny-skia.
///
/// Paints each fragment in document order onto a transparent canvas:
/// fill first, then the outline stroke. Anti-aliasing is disabled so edges
/// stay crisp and adjacent tiles butt together without blended seams.
#[derive(Debug, Default)]
pub struct SkiaRasterizer;

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for SkiaRasterizer {
    fn rasterize(&self, document: &TileDocument) -> Result<Raster, RasterError> {
        let (width, height) = (document.width(), document.height());
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidCanvas {
            width,
            height,
        })?;

        for fragment in document.fragments() {
            let Some(path) = build_path(fragment) else {
                continue;
            };

            if !fragment.style.fill.is_transparent() {
                pixmap.fill_path(
                    &path,
                    &paint(fragment.style.fill),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            if !fragment.style.stroke.is_transparent() {
                pixmap.stroke_path(
                    &path,
                    &paint(fragment.style.stroke),
                    &Stroke {
                        width: fragment.style.stroke_width,
                        ..Default::default()
                    },
                    Transform::identity(),
                    None,
                );
            }
        }

        Ok(demultiply(pixmap))
    }
}

fn paint(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        )),
        anti_alias: false,
        ..Default::default()
    }
}

/// Builds one tiny-skia path from a fragment's elements.
///
/// Degenerate rings (fewer than two points) are dropped; returns `None`
/// when nothing drawable remains.
fn build_path(fragment: &PathFragment) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for element in &fragment.elements {
        match element {
            PathElement::Ring(points) => {
                if points.len() < 2 {
                    continue;
                }
                builder.move_to(points[0].0, points[0].1);
                for &(x, y) in &points[1..] {
                    builder.line_to(x, y);
                }
                builder.close();
            }
            PathElement::Circle { cx, cy, r } => {
                builder.push_circle(*cx, *cy, *r);
            }
        }
    }
    builder.finish()
}

/// Converts the pixmap's premultiplied pixels to straight RGBA8.
fn demultiply(pixmap: Pixmap) -> Raster {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for premultiplied in pixmap.pixels() {
        let pixel = premultiplied.demultiply();
        pixels.extend_from_slice(&[pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()]);
    }
    Raster::from_rgba(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderSpec;
    use crate::render::{PathStyle, STROKE_WIDTH};

    fn document(width: u32, height: u32) -> TileDocument {
        TileDocument::new(&RenderSpec {
            canvas_width: width,
            canvas_height: height,
        })
    }

    fn full_canvas_ring(width: f32, height: f32) -> Vec<(f32, f32)> {
        vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height),
            (0.0, height),
            (0.0, 0.0),
        ]
    }

    fn solid(fill: Color) -> PathStyle {
        PathStyle {
            fill,
            stroke: fill,
            stroke_width: STROKE_WIDTH,
        }
    }

    fn pixel(raster: &Raster, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * raster.width() + x) * 4) as usize;
        raster.pixels()[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn test_empty_document_is_fully_transparent() {
        let raster = SkiaRasterizer::new().rasterize(&document(8, 8)).unwrap();
        assert_eq!(raster.width(), 8);
        assert_eq!(raster.height(), 8);
        assert!(raster.pixels().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_full_canvas_ring_paints_every_pixel() {
        let mut doc = document(8, 8);
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(full_canvas_ring(8.0, 8.0))],
            style: solid(Color::rgb(255, 0, 0)),
        });

        let raster = SkiaRasterizer::new().rasterize(&doc).unwrap();
        for (x, y) in [(0, 0), (7, 0), (0, 7), (7, 7), (4, 4)] {
            assert_eq!(
                pixel(&raster, x, y),
                [255, 0, 0, 255],
                "pixel ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn test_later_fragments_paint_over_earlier_ones() {
        let mut doc = document(8, 8);
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(full_canvas_ring(8.0, 8.0))],
            style: solid(Color::rgb(255, 0, 0)),
        });
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(full_canvas_ring(8.0, 8.0))],
            style: solid(Color::rgb(0, 0, 255)),
        });

        let raster = SkiaRasterizer::new().rasterize(&doc).unwrap();
        assert_eq!(pixel(&raster, 4, 4), [0, 0, 255, 255]);
    }

    #[test]
    fn test_invisible_fragment_contributes_nothing() {
        let mut doc = document(8, 8);
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(full_canvas_ring(8.0, 8.0))],
            style: solid(Color::rgb(255, 0, 0)),
        });
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(full_canvas_ring(8.0, 8.0))],
            style: PathStyle::INVISIBLE,
        });

        let raster = SkiaRasterizer::new().rasterize(&doc).unwrap();
        assert_eq!(
            pixel(&raster, 4, 4),
            [255, 0, 0, 255],
            "Invisible overlay must not disturb pixels beneath it"
        );
    }

    #[test]
    fn test_degenerate_ring_is_skipped() {
        let mut doc = document(8, 8);
        doc.push(PathFragment {
            elements: vec![PathElement::Ring(vec![(1.0, 1.0)])],
            style: solid(Color::rgb(255, 0, 0)),
        });

        let raster = SkiaRasterizer::new().rasterize(&doc).unwrap();
        assert!(raster.pixels().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_zero_sized_canvas_fails() {
        let result = SkiaRasterizer::new().rasterize(&document(0, 8));
        assert_eq!(
            result.unwrap_err(),
            RasterError::InvalidCanvas {
                width: 0,
                height: 8
            }
        );
    }
}
