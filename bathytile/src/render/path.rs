//! Feature-to-path conversion.
//!
//! Converts one geographic feature into a styled vector path fragment by
//! projecting every vertex through the tile's fitted projection. Styling is
//! the single overlay layer this renderer supports: a fill, a one-pixel
//! outline, and crisp (non-antialiased) edges so adjacent tiles butt
//! together without blended seams.

use crate::color::Color;
use crate::config::OutlineMode;
use crate::geojson::{Feature, Geometry};
use crate::projection::Mercator;

/// Stroke width applied to every feature outline, in device pixels.
pub const STROKE_WIDTH: f32 = 1.0;

/// Radius of the circle marker used for point geometry, in device pixels.
pub const POINT_RADIUS: f32 = 4.5;

/// One drawable element of a path fragment, already in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    /// A closed polygon ring.
    Ring(Vec<(f32, f32)>),
    /// A circle marker for point geometry.
    Circle { cx: f32, cy: f32, r: f32 },
}

/// Fill and stroke styling of a fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl PathStyle {
    /// A style with zero visual contribution.
    pub const INVISIBLE: PathStyle = PathStyle {
        fill: Color::TRANSPARENT,
        stroke: Color::TRANSPARENT,
        stroke_width: STROKE_WIDTH,
    };
}

/// A projected, styled feature outline, ready for compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFragment {
    pub elements: Vec<PathElement>,
    pub style: PathStyle,
}

/// Renders one feature into a path fragment.
///
/// Every vertex is projected through `projection`. Polygon rings become
/// closed rings (holes rely on ring winding and the nonzero fill rule);
/// point and multipoint geometry becomes fixed-radius circle markers.
pub fn render_feature(
    feature: &Feature,
    color: Color,
    projection: &Mercator,
    outline: OutlineMode,
) -> PathFragment {
    let stroke = match outline {
        OutlineMode::MatchFill => color,
        OutlineMode::Fixed(neutral) => neutral,
    };

    let project = |lon: f64, lat: f64| {
        let (x, y) = projection.project(lon, lat);
        (x as f32, y as f32)
    };

    let mut elements = Vec::new();
    match &feature.geometry {
        Geometry::Point { coordinates } => {
            let (cx, cy) = project(coordinates.lon, coordinates.lat);
            elements.push(PathElement::Circle {
                cx,
                cy,
                r: POINT_RADIUS,
            });
        }
        Geometry::MultiPoint { coordinates } => {
            for position in coordinates {
                let (cx, cy) = project(position.lon, position.lat);
                elements.push(PathElement::Circle {
                    cx,
                    cy,
                    r: POINT_RADIUS,
                });
            }
        }
        Geometry::Polygon { coordinates } => {
            for ring in coordinates {
                elements.push(PathElement::Ring(
                    ring.iter().map(|p| project(p.lon, p.lat)).collect(),
                ));
            }
        }
    }

    PathFragment {
        elements,
        style: PathStyle {
            fill: color,
            stroke,
            stroke_width: STROKE_WIDTH,
        },
    }
}
