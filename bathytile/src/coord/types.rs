//! Tile address and geographic bounds types

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Address of a tile in the slippy-map power-of-two grid.
///
/// `x` grows eastward from the antimeridian, `y` grows southward from the
/// north pole. Callers are responsible for `0 <= x,y < 2^zoom`; the tile
/// math is total for any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (east-west), 0 at the antimeridian
    pub x: u32,
    /// Y coordinate (north-south), 0 at the top row
    pub y: u32,
}

impl TileAddress {
    /// Creates a new tile address.
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

impl fmt::Display for TileAddress {
    /// Formats as `zoom.x.y`, the stem used by tile file names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.zoom, self.x, self.y)
    }
}

/// Geographic bounding box of a tile, in degrees.
///
/// Invariants for any slippy-map tile: `west < east` and `south < north`.
/// Tiles never straddle the antimeridian, so no wraparound handling exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl GeoBounds {
    /// Returns the four corners as a closed ring, in the order
    /// NW, SW, SE, NE, NW.
    ///
    /// Each element is `(longitude, latitude)`. This is the geometry of the
    /// synthetic padding feature used by tile-bounds projection fitting.
    pub fn corner_ring(&self) -> [(f64, f64); 5] {
        [
            (self.west, self.north),
            (self.west, self.south),
            (self.east, self.south),
            (self.east, self.north),
            (self.west, self.north),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_address_display_matches_file_stem() {
        let address = TileAddress::new(14, 8185, 5449);
        assert_eq!(address.to_string(), "14.8185.5449");
    }

    #[test]
    fn test_corner_ring_is_closed() {
        let bounds = GeoBounds {
            west: -135.0,
            east: -90.0,
            north: 66.5,
            south: 40.9,
        };
        let ring = bounds.corner_ring();
        assert_eq!(ring[0], ring[4], "Ring must start and end at the same corner");
        assert_eq!(ring[0], (-135.0, 66.5));
        assert_eq!(ring[2], (-90.0, 40.9));
    }
}
