//! The tile conversion pipeline.
//!
//! Orchestrates the pure components per tile and owns all side effects:
//!
//! ```text
//! scan input dir ──> for each tile:
//!     tile bounds ──> projection fit ──> classify + render features
//!         ──> composite document ──> rasterize ──> crop/extract ──> write PNG
//! ```
//!
//! Failures are tile-scoped ([`TileError`]): logged, counted and skipped.
//! Only run-level failures ([`PipelineError`]) abort. The sequential
//! [`TilePipeline`] is the reference behavior; [`run_parallel`] fans tiles
//! out across workers that each own a rasterizer instance.

mod error;
mod parallel;
mod runner;
mod scan;

pub use error::{PipelineError, TileError};
pub use parallel::run_parallel;
pub use runner::{padding_feature, process_source, render_tile, RunSummary, TilePipeline};
pub use scan::{scan_tiles, TileSource};
