//! Mercator projection fitting.
//!
//! A [`Mercator`] projection maps `(lon, lat)` to pixel coordinates. It is
//! fitted once per tile: a translation plus a single uniform scale is chosen
//! so that the bounding box of the projected input geometry exactly fits the
//! canvas, centered. Scale is shared by both axes, so angular relationships
//! of the underlying spherical Mercator transform are preserved; the vertical
//! axis is flipped so north is up while pixel `y` grows downward.

use crate::config::RenderSpec;
use crate::coord::{MAX_LAT, MIN_LAT};
use crate::geojson::Feature;
use std::f64::consts::FRAC_PI_4;
use thiserror::Error;

/// Errors that can occur while fitting a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The input geometry has no vertices, or a degenerate (zero-area,
    /// zero-length) extent that no finite scale can fit to the canvas.
    #[error("cannot fit projection over an empty or degenerate geometry extent")]
    InvalidExtent,
}

/// Raw spherical Mercator forward transform.
///
/// Latitude is clamped to the Web Mercator limits so poles stay finite.
/// Returns unscaled radians: `x` in `[-pi, pi]`, `y` in `[-pi, pi]` with
/// north positive.
#[inline]
fn mercator_raw(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = lon.to_radians();
    let y = (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// A Mercator projection fitted to a pixel canvas.
///
/// Built once per tile by [`Mercator::fit`] and reused for every feature in
/// that tile, including the corner-padding feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl Mercator {
    /// Fits a projection so the extent of `features` exactly fills the
    /// canvas, centered.
    ///
    /// The scale is `min(width/extent_width, height/extent_height)` in
    /// projected space; whichever axis has slack is centered. An empty
    /// feature set, or one whose extent collapses to a single point, has no
    /// finite fit and fails with [`ProjectionError::InvalidExtent`].
    pub fn fit<'a, I>(features: I, spec: &RenderSpec) -> Result<Self, ProjectionError>
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for feature in features {
            feature.for_each_vertex(&mut |position| {
                let (x, y) = mercator_raw(position.lon, position.lat);
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            });
        }

        if min_x > max_x {
            return Err(ProjectionError::InvalidExtent);
        }

        let width = spec.canvas_width as f64;
        let height = spec.canvas_height as f64;
        let scale = (width / (max_x - min_x)).min(height / (max_y - min_y));
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ProjectionError::InvalidExtent);
        }

        Ok(Self {
            scale,
            translate_x: (width - scale * (min_x + max_x)) / 2.0,
            translate_y: (height + scale * (min_y + max_y)) / 2.0,
        })
    }

    /// Projects a geographic position to pixel coordinates.
    ///
    /// The vertical axis is flipped: larger latitudes map to smaller `y`.
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = mercator_raw(lon, lat);
        (
            self.scale * x + self.translate_x,
            self.translate_y - self.scale * y,
        )
    }
}

/// Axis-aligned bounding box in pixel space.
///
/// `y0` is the top edge (smallest pixel `y`), `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Bounding box of the projected vertices of `features`, or `None` when
/// there are no vertices.
pub fn projected_bounds<'a, I>(features: I, projection: &Mercator) -> Option<PixelBounds>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut bounds: Option<PixelBounds> = None;

    for feature in features {
        feature.for_each_vertex(&mut |position| {
            let (x, y) = projection.project(position.lon, position.lat);
            let entry = bounds.get_or_insert(PixelBounds {
                x0: x,
                y0: y,
                x1: x,
                y1: y,
            });
            entry.x0 = entry.x0.min(x);
            entry.y0 = entry.y0.min(y);
            entry.x1 = entry.x1.max(x);
            entry.y1 = entry.y1.max(y);
        });
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_bounds, TileAddress};
    use crate::geojson::{Feature, Geometry, LonLat};

    fn corner_feature(address: &TileAddress) -> Feature {
        let ring = tile_bounds(address).corner_ring();
        Feature::bare(Geometry::MultiPoint {
            coordinates: ring.iter().map(|&(lon, lat)| LonLat::new(lon, lat)).collect(),
        })
    }

    fn spec(width: u32, height: u32) -> RenderSpec {
        RenderSpec {
            canvas_width: width,
            canvas_height: height,
        }
    }

    #[test]
    fn test_tile_corners_fill_the_canvas_exactly() {
        for address in [
            TileAddress::new(0, 0, 0),
            TileAddress::new(3, 1, 2),
            TileAddress::new(14, 8185, 5449),
        ] {
            let padding = corner_feature(&address);
            let projection = Mercator::fit(std::iter::once(&padding), &spec(256, 256));
            let projection = match projection {
                Ok(p) => p,
                Err(e) => panic!("fit failed for {}: {}", address, e),
            };

            let bounds = tile_bounds(&address);
            let mut min_x = f64::INFINITY;
            let mut min_y = f64::INFINITY;
            let mut max_x = f64::NEG_INFINITY;
            let mut max_y = f64::NEG_INFINITY;
            for (lon, lat) in bounds.corner_ring() {
                let (x, y) = projection.project(lon, lat);
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }

            let tolerance = 1e-6;
            assert!(min_x.abs() < tolerance, "{}: min_x = {}", address, min_x);
            assert!(min_y.abs() < tolerance, "{}: min_y = {}", address, min_y);
            assert!(
                (max_x - 256.0).abs() < tolerance,
                "{}: max_x = {}",
                address,
                max_x
            );
            assert!(
                (max_y - 256.0).abs() < tolerance,
                "{}: max_y = {}",
                address,
                max_y
            );
        }
    }

    #[test]
    fn test_north_maps_to_smaller_pixel_y() {
        let padding = corner_feature(&TileAddress::new(3, 1, 2));
        let projection = Mercator::fit(std::iter::once(&padding), &spec(256, 256)).unwrap();

        let (_, y_north) = projection.project(-112.0, 60.0);
        let (_, y_south) = projection.project(-112.0, 45.0);
        assert!(
            y_north < y_south,
            "north {} should be above south {}",
            y_north,
            y_south
        );
    }

    #[test]
    fn test_non_square_canvas_centers_the_slack_axis() {
        // A slippy tile is square in Mercator space; on a 512x256 canvas the
        // fit is limited by height and the extent is centered horizontally.
        let padding = corner_feature(&TileAddress::new(2, 1, 1));
        let projection = Mercator::fit(std::iter::once(&padding), &spec(512, 256)).unwrap();

        let bounds = tile_bounds(&TileAddress::new(2, 1, 1));
        let (west_x, north_y) = projection.project(bounds.west, bounds.north);
        let (east_x, south_y) = projection.project(bounds.east, bounds.south);

        assert!((north_y - 0.0).abs() < 1e-6);
        assert!((south_y - 256.0).abs() < 1e-6);
        assert!((west_x - 128.0).abs() < 1e-6, "west_x = {}", west_x);
        assert!((east_x - 384.0).abs() < 1e-6, "east_x = {}", east_x);
    }

    #[test]
    fn test_empty_extent_fails() {
        let features: Vec<Feature> = Vec::new();
        let result = Mercator::fit(features.iter(), &spec(256, 256));
        assert_eq!(result.unwrap_err(), ProjectionError::InvalidExtent);
    }

    #[test]
    fn test_single_point_extent_fails() {
        let point = Feature::bare(Geometry::Point {
            coordinates: LonLat::new(10.0, 50.0),
        });
        let result = Mercator::fit(std::iter::once(&point), &spec(256, 256));
        assert_eq!(result.unwrap_err(), ProjectionError::InvalidExtent);
    }

    #[test]
    fn test_projected_bounds_tracks_vertices() {
        let padding = corner_feature(&TileAddress::new(3, 1, 2));
        let projection = Mercator::fit(std::iter::once(&padding), &spec(256, 256)).unwrap();

        let bounds = projected_bounds(std::iter::once(&padding), &projection).unwrap();
        assert!(bounds.x0.abs() < 1e-6);
        assert!(bounds.y0.abs() < 1e-6);
        assert!((bounds.x1 - 256.0).abs() < 1e-6);
        assert!((bounds.y1 - 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_projected_bounds_of_nothing_is_none() {
        let padding = corner_feature(&TileAddress::new(1, 0, 0));
        let projection = Mercator::fit(std::iter::once(&padding), &spec(256, 256)).unwrap();
        let features: Vec<Feature> = Vec::new();
        assert!(projected_bounds(features.iter(), &projection).is_none());
    }
}
