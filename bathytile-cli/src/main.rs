//! Bathytile CLI - command-line interface
//!
//! Renders a directory of `{zoom}.{x}.{y}.geojson` tile files into PNG
//! overlay tiles, driven by a JSON configuration file with optional flag
//! overrides.

use bathytile::config::{ConvertConfig, CropPolicy, FitMode};
use bathytile::logging::init_logging;
use bathytile::pipeline::{run_parallel, RunSummary, TilePipeline};
use bathytile::raster::SkiaRasterizer;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, ValueEnum)]
enum FitModeArg {
    /// Fit the projection to the tile's geographic extent (default)
    TileBounds,
    /// Fit the projection tightly around the tile's features
    FeatureBounds,
}

impl From<FitModeArg> for FitMode {
    fn from(arg: FitModeArg) -> Self {
        match arg {
            FitModeArg::TileBounds => FitMode::TileBounds,
            FitModeArg::FeatureBounds => FitMode::FeatureBounds,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum CropPolicyArg {
    /// Write the entire canvas (default)
    FullCanvas,
    /// Trim the output to the vertical span of the features
    FeatureBounds,
}

impl From<CropPolicyArg> for CropPolicy {
    fn from(arg: CropPolicyArg) -> Self {
        match arg {
            CropPolicyArg::FullCanvas => CropPolicy::FullCanvas,
            CropPolicyArg::FeatureBounds => CropPolicy::FeatureBounds,
        }
    }
}

#[derive(Parser)]
#[command(name = "bathytile", version = bathytile::VERSION)]
#[command(about = "Render GeoJSON depth-contour tiles to PNG overlays", long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "convert-config.json")]
    config: PathBuf,

    /// Override the input directory from the config file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the output directory from the config file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the projection fitting mode
    #[arg(long, value_enum)]
    fit_mode: Option<FitModeArg>,

    /// Override the raster crop policy
    #[arg(long, value_enum)]
    crop: Option<CropPolicyArg>,

    /// Override the number of worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Exit nonzero when any tile fails
    #[arg(long)]
    strict: bool,

    /// Directory for the log file (console-only when omitted)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    let mut config = match ConvertConfig::load_from(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    // Flag overrides beat the config file.
    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(fit_mode) = args.fit_mode {
        config.fit_mode = fit_mode.into();
    }
    if let Some(crop) = args.crop {
        config.crop_policy = crop.into();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.strict {
        config.strict = true;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    println!("Rendering tiles:");
    println!("  Input: {}", config.input_dir.display());
    println!("  Output: {}", config.output_dir.display());
    println!(
        "  Canvas: {}x{}",
        config.render.canvas_width, config.render.canvas_height
    );
    println!("  Bands: {}", config.bands.len());
    println!(
        "  Fit: {:?}, Crop: {:?}, Workers: {}",
        config.fit_mode, config.crop_policy, config.workers
    );
    println!();

    let start = std::time::Instant::now();
    let strict = config.strict;

    let result = if config.workers > 1 {
        run_parallel(&config, SkiaRasterizer::new)
    } else {
        TilePipeline::new(config, SkiaRasterizer::new()).run()
    };

    let summary: RunSummary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let elapsed = start.elapsed();
    println!(
        "✓ Rendered {} of {} tiles in {:.2}s",
        summary.processed,
        summary.total(),
        elapsed.as_secs_f64()
    );
    if summary.failed > 0 {
        println!("  {} tile(s) failed; see log for details", summary.failed);
        if strict {
            process::exit(1);
        }
    }
}
