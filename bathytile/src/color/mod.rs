//! Depth-band color classification.
//!
//! A globally configured, ordered table of [`ColorBand`]s maps a feature's
//! average depth to a display color. Features without usable depth
//! properties render fully transparent; a depth no band covers is a hard
//! error so that a misconfigured band table cannot silently drop data.

use crate::geojson::Feature;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An RGBA display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// The fully transparent color. Renders nothing and leaves anything
    /// beneath it unaffected.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS `rgba()` form, as used in the SVG document styles.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

/// Errors raised when parsing a configured color code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The color code is not a recognized hex form
    #[error("invalid color code '{0}' (expected #rgb, #rrggbb or #rrggbbaa)")]
    InvalidCode(String),
}

impl FromStr for Color {
    type Err = ColorError;

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` hex color codes.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidCode(code.to_string());
        let digits = code.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => {
                let wide = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Color {
                    r: wide(0)?,
                    g: wide(1)?,
                    b: wide(2)?,
                    a: 255,
                })
            }
            6 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: 255,
            }),
            8 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = <String as serde::Deserialize>::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the configured band table: a closed depth interval and the
/// color it maps to.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBand {
    pub min_depth: f64,
    pub max_depth: f64,
    #[serde(rename = "code")]
    pub color: Color,
}

impl ColorBand {
    pub fn new(min_depth: f64, max_depth: f64, color: Color) -> Self {
        Self {
            min_depth,
            max_depth,
            color,
        }
    }

    /// Whether the closed interval `[min_depth, max_depth]` contains `depth`.
    #[inline]
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min_depth && depth <= self.max_depth
    }
}

/// Errors that can occur during depth classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The average depth matched no configured band
    #[error("depth {depth} matches no configured color band")]
    UnclassifiedDepth { depth: f64 },
}

/// Classifies a feature's average depth against the band table.
///
/// Features missing `minDepth`/`maxDepth` (or carrying non-numeric values)
/// classify to [`Color::TRANSPARENT`]. Otherwise the first band in table
/// order whose interval contains the average wins; bands may overlap, in
/// which case table order is the tie-break.
pub fn classify_feature(feature: &Feature, bands: &[ColorBand]) -> Result<Color, ClassifyError> {
    let Some((min, max)) = feature.depth_range() else {
        return Ok(Color::TRANSPARENT);
    };
    let average = (min + max) / 2.0;
    bands
        .iter()
        .find(|band| band.contains(average))
        .map(|band| band.color)
        .ok_or(ClassifyError::UnclassifiedDepth { depth: average })
}
