//! GeoJSON data model for tile feature files.
//!
//! Each input tile is a GeoJSON `FeatureCollection` restricted to the
//! geometry kinds the renderer supports: `Point`, `MultiPoint` and `Polygon`.
//! Depth attributes live in feature properties as `minDepth` / `maxDepth`.
//!
//! Deserialization is serde-based; positions tolerate an optional elevation
//! element, which is ignored.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A geographic position: longitude and latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl<'de> Deserialize<'de> for LonLat {
    /// Accepts a GeoJSON position array `[lon, lat]` or `[lon, lat, elevation]`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let elements = <Vec<f64>>::deserialize(deserializer)?;
        if elements.len() < 2 {
            return Err(de::Error::invalid_length(
                elements.len(),
                &"a position with at least longitude and latitude",
            ));
        }
        Ok(LonLat {
            lon: elements[0],
            lat: elements[1],
        })
    }
}

/// Renderable GeoJSON geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: LonLat,
    },
    MultiPoint {
        coordinates: Vec<LonLat>,
    },
    /// Rings of positions; the first ring is the exterior, the rest are holes.
    Polygon {
        coordinates: Vec<Vec<LonLat>>,
    },
}

impl Geometry {
    /// Visits every vertex of the geometry.
    pub fn for_each_vertex(&self, visit: &mut dyn FnMut(LonLat)) {
        match self {
            Geometry::Point { coordinates } => visit(*coordinates),
            Geometry::MultiPoint { coordinates } => {
                for position in coordinates {
                    visit(*position);
                }
            }
            Geometry::Polygon { coordinates } => {
                for ring in coordinates {
                    for position in ring {
                        visit(*position);
                    }
                }
            }
        }
    }
}

/// One geographic feature with its attribute map.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// Creates a feature with no properties, used for synthetic geometry
    /// such as the tile-corner padding feature.
    pub fn bare(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: None,
        }
    }

    /// Returns `(minDepth, maxDepth)` when both properties are present and
    /// numeric; `None` otherwise.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        let properties = self.properties.as_ref()?;
        let min = properties.get("minDepth")?.as_f64()?;
        let max = properties.get("maxDepth")?.as_f64()?;
        Some((min, max))
    }

    /// Visits every vertex of the feature's geometry.
    pub fn for_each_vertex(&self, visit: &mut dyn FnMut(LonLat)) {
        self.geometry.for_each_vertex(visit);
    }
}

/// An ordered sequence of features; order is paint order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parses a GeoJSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
