//! Error types for the conversion pipeline.
//!
//! Errors are split by blast radius: a [`TileError`] is scoped to one tile
//! and never aborts the run (the runner logs it and moves on), while a
//! [`PipelineError`] is a run-level failure such as an unreadable input
//! directory, which is fatal.

use crate::color::ClassifyError;
use crate::projection::ProjectionError;
use crate::raster::{ExtractError, RasterError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors scoped to a single tile.
#[derive(Debug, Error)]
pub enum TileError {
    /// Projection fit attempted over an empty or degenerate extent
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// A feature's depth matched no configured band
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// The rasterization collaborator failed
    #[error("rasterization failed: {0}")]
    Rasterization(#[from] RasterError),

    /// Cropping or PNG encoding failed
    #[error("raster extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// The tile's GeoJSON file could not be read
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The tile's GeoJSON file could not be parsed
    #[error("invalid GeoJSON in {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The output raster could not be written
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Run-level failures that abort the whole conversion.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input directory could not be scanned
    #[error("failed to read input directory {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output directory could not be created
    #[error("failed to create output directory {path}: {source}")]
    OutputDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
