//! Bathytile - depth-contour map tiles rendered to PNG overlays
//!
//! This library converts per-tile GeoJSON feature collections into fixed-size
//! PNG raster tiles, colored by each feature's depth attributes and projected
//! with a Mercator projection fitted to the tile.
//!
//! # High-Level API
//!
//! For most use cases, build a [`pipeline::TilePipeline`] from a loaded
//! configuration and run it over an input directory:
//!
//! ```ignore
//! use bathytile::config::ConvertConfig;
//! use bathytile::pipeline::TilePipeline;
//! use bathytile::raster::SkiaRasterizer;
//!
//! let config = ConvertConfig::load_from("convert-config.json".as_ref())?;
//! let pipeline = TilePipeline::new(config, SkiaRasterizer::new());
//! let summary = pipeline.run()?;
//! println!("{} rendered, {} failed", summary.processed, summary.failed);
//! ```

pub mod color;
pub mod config;
pub mod coord;
pub mod geojson;
pub mod logging;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod render;

/// Version of the bathytile library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
