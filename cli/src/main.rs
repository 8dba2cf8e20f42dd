//! Command-line driver for `vecplot-core`: loads a raster image from disk,
//! runs the vectorization pipeline, and writes the resulting paths (or
//! curve segments) as JSON.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use vecplot_core::{
    process, process_with_curves, AdvancedOptions, CurveSegment, HatchingStyle as CoreHatchingStyle, Mode as CoreMode,
    Options, PipelineSeed, Polyline, Raster, WeightStyle as CoreWeightStyle,
};

#[derive(Parser)]
#[command(name = "vecplot", about = "Image-to-plotter vectorization pipeline CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Vectorize a single image and write its paths (or curves) as JSON.
    Vectorize(VectorizeArgs),
    /// Run the pipeline repeatedly over one image and report timing stats.
    Benchmark(BenchmarkArgs),
}

#[derive(Parser)]
struct VectorizeArgs {
    /// Input raster image (any format the `image` crate decodes).
    input: PathBuf,

    /// Output JSON file. Defaults to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extraction mode.
    #[arg(long, value_enum, default_value_t = ModeArg::ColorRegions)]
    mode: ModeArg,

    /// Emit curve segments (Bezier/Arc) instead of raw polylines.
    #[arg(long)]
    emit_curves: bool,

    #[command(flatten)]
    options: OptionsArgs,

    #[command(flatten)]
    advanced: AdvancedArgs,
}

#[derive(Parser)]
struct OptionsArgs {
    /// Number of color clusters for ColorRegions mode (2..=32).
    #[arg(long, default_value_t = 8)]
    num_colors: u32,
    /// Grayscale threshold for Centerline/Hatching mode (0..=255).
    #[arg(long, default_value_t = 128)]
    threshold: u8,
    /// Row-run stitching proximity for Centerline mode (0..=50).
    #[arg(long, default_value_t = 5.0)]
    proximity: f64,
    /// Base hatch line spacing in pixels (1..=20).
    #[arg(long, default_value_t = 4.0)]
    hatch_spacing: f64,
    /// Hatch angle in degrees (0..=180).
    #[arg(long, default_value_t = 45.0)]
    hatch_angle: f64,
}

#[derive(Parser)]
struct AdvancedArgs {
    #[arg(long)]
    enable_curve_fitting: bool,
    #[arg(long, default_value_t = 2.0)]
    curve_tolerance: f64,
    #[arg(long)]
    enable_arc_conversion: bool,
    #[arg(long, value_enum, default_value_t = HatchingStyleArg::Parallel)]
    hatching_style: HatchingStyleArg,
    #[arg(long)]
    enable_variable_weight: bool,
    #[arg(long, value_enum, default_value_t = WeightStyleArg::Parallel)]
    line_weight_style: WeightStyleArg,
    #[arg(long)]
    enable_path_optimization: bool,
    #[arg(long, default_value_t = true)]
    enable_path_merging: bool,
    #[arg(long, default_value_t = true)]
    enable_2opt: bool,
    /// Seed for k-means initialization and Poisson-disk sampling.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct BenchmarkArgs {
    input: PathBuf,
    #[arg(long, value_enum, default_value_t = ModeArg::ColorRegions)]
    mode: ModeArg,
    #[arg(long, default_value_t = 5)]
    iterations: u32,
    #[command(flatten)]
    options: OptionsArgs,
}

#[derive(Copy, Clone, ValueEnum)]
enum ModeArg {
    ColorRegions,
    Centerline,
    Hatching,
}

impl From<ModeArg> for CoreMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::ColorRegions => CoreMode::ColorRegions,
            ModeArg::Centerline => CoreMode::Centerline,
            ModeArg::Hatching => CoreMode::Hatching,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum HatchingStyleArg {
    Parallel,
    Contour,
    Cross,
    Stippling,
}

impl From<HatchingStyleArg> for CoreHatchingStyle {
    fn from(s: HatchingStyleArg) -> Self {
        match s {
            HatchingStyleArg::Parallel => CoreHatchingStyle::Parallel,
            HatchingStyleArg::Contour => CoreHatchingStyle::Contour,
            HatchingStyleArg::Cross => CoreHatchingStyle::Cross,
            HatchingStyleArg::Stippling => CoreHatchingStyle::Stippling,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum WeightStyleArg {
    Parallel,
    Outline,
    Scribble,
    Zigzag,
}

impl From<WeightStyleArg> for CoreWeightStyle {
    fn from(s: WeightStyleArg) -> Self {
        match s {
            WeightStyleArg::Parallel => CoreWeightStyle::Parallel,
            WeightStyleArg::Outline => CoreWeightStyle::Outline,
            WeightStyleArg::Scribble => CoreWeightStyle::Scribble,
            WeightStyleArg::Zigzag => CoreWeightStyle::Zigzag,
        }
    }
}

impl OptionsArgs {
    fn to_core(&self) -> Options {
        Options {
            num_colors: self.num_colors,
            threshold: self.threshold,
            proximity: self.proximity,
            hatch_spacing: self.hatch_spacing,
            hatch_angle: self.hatch_angle,
        }
    }
}

impl AdvancedArgs {
    fn to_core(&self) -> AdvancedOptions {
        AdvancedOptions {
            enable_curve_fitting: self.enable_curve_fitting,
            curve_tolerance: self.curve_tolerance,
            enable_arc_conversion: self.enable_arc_conversion,
            hatching_style: self.hatching_style.into(),
            enable_variable_weight: self.enable_variable_weight,
            line_weight_style: self.line_weight_style.into(),
            enable_path_optimization: self.enable_path_optimization,
            enable_path_merging: self.enable_path_merging,
            enable_2opt: self.enable_2opt,
            seed: self.seed.map(PipelineSeed).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum PathOutput {
    Polylines(Vec<Polyline>),
    Curves(Vec<CurveSegment>),
}

#[derive(Serialize)]
struct VectorizeOutput {
    width: u32,
    height: u32,
    mode: &'static str,
    path_count: usize,
    elapsed_ms: f64,
    paths: PathOutput,
}

#[derive(Serialize)]
struct BenchmarkOutput {
    input: String,
    mode: &'static str,
    iterations: u32,
    mean_ms: f64,
    min_ms: f64,
    max_ms: f64,
    path_count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    match cli.command {
        Commands::Vectorize(args) => run_vectorize(args),
        Commands::Benchmark(args) => run_benchmark(args),
    }
}

fn mode_label(mode: ModeArg) -> &'static str {
    match mode {
        ModeArg::ColorRegions => "color_regions",
        ModeArg::Centerline => "centerline",
        ModeArg::Hatching => "hatching",
    }
}

fn load_raster(path: &PathBuf) -> Result<Raster> {
    let img = image::open(path).with_context(|| format!("failed to decode image at {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::new(width, height, rgba.into_raw()).map_err(|e| anyhow::anyhow!("invalid raster: {e}"))
}

fn run_vectorize(args: VectorizeArgs) -> Result<()> {
    let raster = load_raster(&args.input)?;
    let options = args.options.to_core();
    let advanced = args.advanced.to_core();
    let mode: CoreMode = args.mode.into();

    let started = Instant::now();
    let output_paths = if args.emit_curves {
        let curves = process_with_curves(&raster, mode, &options, &advanced).context("vectorization failed")?;
        PathOutput::Curves(curves)
    } else {
        let paths = process(&raster, mode, &options, &advanced).context("vectorization failed")?;
        PathOutput::Polylines(paths)
    };
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let path_count = match &output_paths {
        PathOutput::Polylines(p) => p.len(),
        PathOutput::Curves(c) => c.len(),
    };

    log::info!("vectorize: produced {path_count} paths in {elapsed_ms:.2}ms");

    let output = VectorizeOutput {
        width: raster.width(),
        height: raster.height(),
        mode: mode_label(args.mode),
        path_count,
        elapsed_ms,
        paths: output_paths,
    };

    let json = serde_json::to_string_pretty(&output).context("failed to serialize output")?;
    match args.output {
        Some(path) => fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn run_benchmark(args: BenchmarkArgs) -> Result<()> {
    let raster = load_raster(&args.input)?;
    let options = args.options.to_core();
    let advanced = AdvancedOptions::default();
    let mode: CoreMode = args.mode.into();

    let mut durations_ms = Vec::with_capacity(args.iterations as usize);
    let mut path_count = 0;

    for i in 0..args.iterations {
        let started = Instant::now();
        let paths = process(&raster, mode, &options, &advanced).context("vectorization failed")?;
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        log::debug!("benchmark iteration {i}: {elapsed:.2}ms, {} paths", paths.len());
        path_count = paths.len();
        durations_ms.push(elapsed);
    }

    let mean_ms = durations_ms.iter().sum::<f64>() / durations_ms.len() as f64;
    let min_ms = durations_ms.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_ms = durations_ms.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let output = BenchmarkOutput {
        input: args.input.display().to_string(),
        mode: mode_label(args.mode),
        iterations: args.iterations,
        mean_ms,
        min_ms,
        max_ms,
        path_count,
    };

    println!("{}", serde_json::to_string_pretty(&output).context("failed to serialize benchmark output")?);
    Ok(())
}
