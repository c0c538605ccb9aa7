//! Conversion configuration.
//!
//! All configuration is loaded once into an immutable [`ConvertConfig`] and
//! passed into pipeline construction; there is no ambient/global state. The
//! on-disk format is a JSON file whose core keys (`geojsonDirectory`,
//! `outputDirectory`, `outputWidth`, `outputHeight`, `colors`) match the
//! established converter config layout; the mode switches are optional and
//! default to the classic behavior (tile-bounds fit, full-canvas crop).

use crate::color::{Color, ColorBand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed output raster dimensions, shared by every tile of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RenderSpec {
    #[serde(rename = "outputWidth")]
    pub canvas_width: u32,
    #[serde(rename = "outputHeight")]
    pub canvas_height: u32,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            canvas_width: 256,
            canvas_height: 256,
        }
    }
}

/// Which geometry extent the per-tile projection is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Include a synthetic corner feature so the fit matches the tile's
    /// geographic extent. Features near tile edges land where adjacent
    /// tiles expect them, and empty tiles still have a defined projection.
    #[default]
    TileBounds,
    /// Fit tightly around the features actually present in the tile.
    /// Not comparable across tiles; empty tiles cannot be fitted.
    FeatureBounds,
}

/// Which window of the rasterized canvas is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropPolicy {
    /// The entire canvas.
    #[default]
    FullCanvas,
    /// The vertical span of the projected features, trimming whitespace
    /// above and below. Requires at least one feature in the tile.
    FeatureBounds,
}

/// How feature outlines are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutlineMode {
    /// Stroke with the feature's classified fill color.
    #[default]
    MatchFill,
    /// Stroke every feature with one fixed neutral color.
    Fixed(Color),
}

fn default_workers() -> usize {
    1
}

/// Immutable configuration for one conversion run.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// Directory scanned for `{zoom}.{x}.{y}.geojson` tile files.
    #[serde(rename = "geojsonDirectory")]
    pub input_dir: PathBuf,
    /// Directory receiving one `{zoom}.{x}.{y}.png` per tile.
    #[serde(rename = "outputDirectory")]
    pub output_dir: PathBuf,
    /// Output raster dimensions.
    #[serde(flatten)]
    pub render: RenderSpec,
    /// Ordered depth band table; order is classification precedence.
    #[serde(rename = "colors")]
    pub bands: Vec<ColorBand>,
    /// Projection fitting mode.
    #[serde(rename = "fitMode", default)]
    pub fit_mode: FitMode,
    /// Raster crop policy.
    #[serde(rename = "cropPolicy", default)]
    pub crop_policy: CropPolicy,
    /// Outline stroke mode.
    #[serde(default)]
    pub outline: OutlineMode,
    /// When set, a run with failed tiles reports failure to the caller
    /// (nonzero exit from the CLI) instead of merely logging.
    #[serde(default)]
    pub strict: bool,
    /// Number of worker threads; 1 means the classic sequential pipeline.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema
    #[error("invalid config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A value is structurally valid but unusable
    #[error("invalid configuration: {key} - {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConvertConfig {
    /// Loads and validates configuration from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value-level invariants that the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.canvas_width == 0 || self.render.canvas_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "outputWidth/outputHeight",
                reason: format!(
                    "canvas dimensions must be positive, got {}x{}",
                    self.render.canvas_width, self.render.canvas_height
                ),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "workers",
                reason: "worker count must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
