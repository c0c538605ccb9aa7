//! Parallel tile runner.
//!
//! Tiles are embarrassingly parallel once each worker owns its own
//! rasterizer instance: the band table and render spec are read-only, and
//! no other state is shared. Workers pull from a shared cursor over the
//! sorted tile list; per-tile failure containment is identical to the
//! sequential runner.

use super::{process_source, scan_tiles, PipelineError, RunSummary};
use crate::config::ConvertConfig;
use crate::raster::Rasterizer;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::{error, info};

/// Processes all tiles with `config.workers` worker threads.
///
/// `make_rasterizer` is called once per worker, on the worker's own thread,
/// so every worker acquires its own rasterizer collaborator; each instance
/// is released when its worker finishes, on every exit path.
pub fn run_parallel<R, F>(config: &ConvertConfig, make_rasterizer: F) -> Result<RunSummary, PipelineError>
where
    R: Rasterizer,
    F: Fn() -> R + Sync,
{
    fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::OutputDirFailed {
        path: config.output_dir.clone(),
        source,
    })?;

    let sources = scan_tiles(&config.input_dir)?;
    info!(
        tiles = sources.len(),
        workers = config.workers,
        "starting parallel conversion run"
    );

    let cursor = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..config.workers {
            let builder = thread::Builder::new().name(format!("tile-worker-{}", worker));
            builder
                .spawn_scoped(scope, || {
                    let rasterizer = make_rasterizer();
                    loop {
                        let index = cursor.fetch_add(1, Ordering::SeqCst);
                        let Some(source) = sources.get(index) else {
                            break;
                        };
                        match process_source(config, &rasterizer, source) {
                            Ok(()) => {
                                processed.fetch_add(1, Ordering::SeqCst);
                            }
                            Err(tile_error) => {
                                error!(tile = %source.address, error = %tile_error, "tile failed, skipping");
                                failed.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                    }
                })
                .expect("failed to spawn tile worker thread");
        }
    });

    let summary = RunSummary {
        processed: processed.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
    };
    info!(
        processed = summary.processed,
        failed = summary.failed,
        "parallel conversion run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorBand};
    use crate::config::{CropPolicy, FitMode, OutlineMode, RenderSpec};
    use crate::raster::SkiaRasterizer;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn tile_json(min_depth: f64, max_depth: f64) -> String {
        format!(
            r#"{{
                "type": "FeatureCollection",
                "features": [{{
                    "type": "Feature",
                    "geometry": {{"type": "Polygon", "coordinates": [
                        [[-120.0, 50.0], [-100.0, 50.0], [-100.0, 60.0], [-120.0, 60.0], [-120.0, 50.0]]
                    ]}},
                    "properties": {{"minDepth": {}, "maxDepth": {}}}
                }}]
            }}"#,
            min_depth, max_depth
        )
    }

    fn config_for(input: &TempDir, output: &TempDir, workers: usize) -> ConvertConfig {
        ConvertConfig {
            input_dir: input.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            render: RenderSpec {
                canvas_width: 32,
                canvas_height: 32,
            },
            bands: vec![ColorBand::new(0.0, 100.0, Color::rgb(255, 0, 0))],
            fit_mode: FitMode::TileBounds,
            crop_policy: CropPolicy::FullCanvas,
            outline: OutlineMode::MatchFill,
            strict: false,
            workers,
        }
    }

    #[test]
    fn test_parallel_run_processes_every_tile() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for x in 0..4u32 {
            for y in 0..2u32 {
                fs::write(
                    input.path().join(format!("3.{}.{}.geojson", x, y)),
                    tile_json(1.0, 3.0),
                )
                .unwrap();
            }
        }

        let config = config_for(&input, &output, 4);
        let summary = run_parallel(&config, SkiaRasterizer::new).unwrap();

        assert_eq!(summary.processed, 8);
        assert_eq!(summary.failed, 0);
        for x in 0..4u32 {
            for y in 0..2u32 {
                assert!(
                    output.path().join(format!("3.{}.{}.png", x, y)).exists(),
                    "missing output for tile 3.{}.{}",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_each_worker_gets_its_own_rasterizer() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for x in 0..6u32 {
            fs::write(
                input.path().join(format!("4.{}.3.geojson", x)),
                tile_json(1.0, 3.0),
            )
            .unwrap();
        }

        let instances = Mutex::new(0usize);
        let config = config_for(&input, &output, 3);
        let summary = run_parallel(&config, || {
            *instances.lock().unwrap() += 1;
            SkiaRasterizer::new()
        })
        .unwrap();

        assert_eq!(summary.processed, 6);
        assert_eq!(
            *instances.lock().unwrap(),
            3,
            "one rasterizer per worker thread"
        );
    }

    #[test]
    fn test_failed_tiles_do_not_stop_other_workers() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("3.0.0.geojson"), tile_json(1.0, 3.0)).unwrap();
        fs::write(input.path().join("3.1.0.geojson"), b"broken").unwrap();
        fs::write(input.path().join("3.2.0.geojson"), tile_json(1.0, 3.0)).unwrap();

        let config = config_for(&input, &output, 2);
        let summary = run_parallel(&config, SkiaRasterizer::new).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert!(output.path().join("3.0.0.png").exists());
        assert!(!output.path().join("3.1.0.png").exists());
        assert!(output.path().join("3.2.0.png").exists());
    }
}
