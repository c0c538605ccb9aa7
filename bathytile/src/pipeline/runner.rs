//! Per-tile orchestration and the sequential runner.
//!
//! [`render_tile`] is the full in-memory pipeline for one tile:
//! bounds -> projection fit -> classify -> render -> composite ->
//! rasterize -> extract. [`TilePipeline`] wraps it with tile discovery and
//! output writing, processing tiles one at a time against a single
//! rasterizer instance. Tile failures are contained: they are logged and
//! counted, and the run continues.

use super::{scan_tiles, PipelineError, TileError, TileSource};
use crate::color::{classify_feature, Color};
use crate::config::{ConvertConfig, CropPolicy, FitMode};
use crate::coord::{tile_bounds, GeoBounds, TileAddress};
use crate::geojson::{Feature, FeatureCollection, Geometry, LonLat};
use crate::projection::{projected_bounds, Mercator};
use crate::raster::{extract, CropWindow, ExtractError, Rasterizer, RenderedTile};
use crate::render::{render_feature, TileDocument};
use std::fs;
use tracing::{debug, error, info};

/// Counts of the outcome of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tiles rendered and written
    pub processed: usize,
    /// Tiles skipped after a tile-scoped failure
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Builds the synthetic corner feature for tile-bounds projection fitting.
///
/// A `MultiPoint` over the tile's corner ring: it pins the projection fit to
/// the tile's geographic extent without contributing pixels (the compositor
/// forces its style invisible).
pub fn padding_feature(bounds: &GeoBounds) -> Feature {
    Feature::bare(Geometry::MultiPoint {
        coordinates: bounds
            .corner_ring()
            .iter()
            .map(|&(lon, lat)| LonLat::new(lon, lat))
            .collect(),
    })
}

/// Runs the in-memory pipeline for one tile.
pub fn render_tile<R: Rasterizer>(
    config: &ConvertConfig,
    rasterizer: &R,
    address: TileAddress,
    collection: &FeatureCollection,
) -> Result<RenderedTile, TileError> {
    let bounds = tile_bounds(&address);
    let padding = match config.fit_mode {
        FitMode::TileBounds => Some(padding_feature(&bounds)),
        FitMode::FeatureBounds => None,
    };

    let projection = Mercator::fit(
        collection.features.iter().chain(padding.as_ref()),
        &config.render,
    )?;

    let mut document = TileDocument::new(&config.render);
    for feature in &collection.features {
        let color = classify_feature(feature, &config.bands)?;
        document.push(render_feature(feature, color, &projection, config.outline));
    }
    if let Some(padding) = &padding {
        document.push_padding(render_feature(
            padding,
            Color::TRANSPARENT,
            &projection,
            config.outline,
        ));
    }

    let raster = rasterizer.rasterize(&document)?;

    let window = match config.crop_policy {
        CropPolicy::FullCanvas => CropWindow::full_canvas(&config.render),
        CropPolicy::FeatureBounds => {
            let feature_extent = projected_bounds(collection.features.iter(), &projection)
                .ok_or(ExtractError::EmptyCrop)?;
            CropWindow::feature_bounds(&feature_extent, &config.render)?
        }
    };

    Ok(extract(&raster, &window)?)
}

/// Loads, renders and writes one discovered tile.
pub fn process_source<R: Rasterizer>(
    config: &ConvertConfig,
    rasterizer: &R,
    source: &TileSource,
) -> Result<(), TileError> {
    let collection = source.load()?;
    let rendered = render_tile(config, rasterizer, source.address, &collection)?;
    let bytes = rendered.encode_png()?;

    let output_path = config.output_dir.join(format!("{}.png", source.address));
    fs::write(&output_path, &bytes).map_err(|io_error| TileError::WriteFailed {
        path: output_path.clone(),
        source: io_error,
    })?;

    debug!(
        tile = %source.address,
        features = collection.features.len(),
        crop_top = rendered.window.top,
        crop_height = rendered.window.height,
        bytes = bytes.len(),
        "tile written"
    );
    Ok(())
}

/// Sequential tile pipeline: one rasterizer, tiles processed in order.
///
/// The rasterizer is acquired at construction and released when the
/// pipeline is dropped, on every exit path.
pub struct TilePipeline<R: Rasterizer> {
    config: ConvertConfig,
    rasterizer: R,
}

impl<R: Rasterizer> TilePipeline<R> {
    pub fn new(config: ConvertConfig, rasterizer: R) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Discovers and processes every tile in the input directory.
    ///
    /// Tile-scoped failures are logged and counted, never propagated; only
    /// run-level failures (unreadable input directory, uncreatable output
    /// directory) abort.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            PipelineError::OutputDirFailed {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;

        let sources = scan_tiles(&self.config.input_dir)?;
        info!(tiles = sources.len(), input = %self.config.input_dir.display(), "starting conversion run");

        let mut summary = RunSummary::default();
        for source in &sources {
            match process_source(&self.config, &self.rasterizer, source) {
                Ok(()) => summary.processed += 1,
                Err(tile_error) => {
                    error!(tile = %source.address, error = %tile_error, "tile failed, skipping");
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            "conversion run complete"
        );
        Ok(summary)
    }
}
