//! Image-to-plotter vectorization pipeline.
//!
//! Converts a raster image into an ordered set of 2D polyline or curve
//! paths suitable for a pen plotter: three extraction strategies
//! ([`Mode::ColorRegions`], [`Mode::Centerline`], [`Mode::Hatching`]),
//! optional variable line-weight simulation, pen-travel optimization, and
//! optional curve fitting. Single-threaded and fully synchronous: a
//! pipeline invocation runs start to finish on one logical thread, since
//! every stage is a pure transform over owned data with no shared mutable
//! state.
//!
//! This crate never decodes image files; callers construct a [`Raster`]
//! from already-decoded RGBA8 pixels.

pub mod algorithms;
pub mod config;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod random;
pub mod raster;

pub use config::{AdvancedOptions, HatchingStyle, Mode, Options, WeightStyle};
pub use curve::CurveSegment;
pub use error::{VectorizeError, VectorizeResult};
pub use geometry::{Point, Polyline};
pub use random::PipelineSeed;
pub use raster::{Mask, Raster};

use algorithms::weight_sim::{analyze_weight, simulate, WeightContext, WeightedPath};

/// Extract and optimize polyline paths from `raster`.
///
/// `options` is validated up front; every other recoverable condition
/// (k-means non-convergence, degenerate fits, empty output) is neutralized
/// internally per the pipeline's error-handling design and never surfaces
/// here.
pub fn process(raster: &Raster, mode: Mode, options: &Options, advanced: &AdvancedOptions) -> VectorizeResult<Vec<Polyline>> {
    options.validate()?;

    log::info!("process: mode={mode:?} raster={}x{}", raster.width(), raster.height());

    let mut paths = match mode {
        Mode::ColorRegions => algorithms::color_regions::extract(raster, options, advanced.seed),
        Mode::Centerline => algorithms::centerline::extract(raster, options),
        Mode::Hatching => algorithms::hatching::extract(raster, options, advanced.hatching_style, advanced.seed),
    };

    // Variable line-weight simulation is skipped in Hatching mode: hatch
    // strokes already carry their own tonal weight via density (spec.md §6).
    if advanced.enable_variable_weight && !matches!(mode, Mode::Hatching) {
        paths = apply_weight_simulation(raster, paths, advanced);
    }

    if advanced.enable_path_optimization {
        let result = algorithms::path_optimizer::optimize(paths, advanced.enable_path_merging, advanced.enable_2opt);
        log::info!(
            "process: optimized {} paths, travel={:.1}, improvement={:.1}%",
            result.paths.len(),
            result.total_distance,
            result.improvement
        );
        paths = result.paths;
    }

    Ok(paths)
}

/// Like [`process`], but fits each output path into [`CurveSegment`]s.
///
/// When `advanced.enable_curve_fitting` is set, each polyline is run
/// through the greedy-window Bezier fitter (with optional arc conversion).
/// When it is unset, each input segment is represented as a straight,
/// control-points-on-the-chord Bezier — the output shape stays uniform
/// (always `CurveSegment`s) without performing any fitting work.
pub fn process_with_curves(
    raster: &Raster,
    mode: Mode,
    options: &Options,
    advanced: &AdvancedOptions,
) -> VectorizeResult<Vec<CurveSegment>> {
    let paths = process(raster, mode, options, advanced)?;

    let mut curves = Vec::new();
    for path in paths {
        if advanced.enable_curve_fitting {
            curves.extend(algorithms::curve_fit::fit_curves_with_arcs(
                &path,
                advanced.curve_tolerance,
                advanced.enable_arc_conversion,
            ));
        } else {
            curves.extend(straight_segments(&path));
        }
    }

    Ok(curves)
}

fn straight_segments(path: &Polyline) -> Vec<CurveSegment> {
    path.windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let control1 = Point::new(start.x + (end.x - start.x) / 3.0, start.y + (end.y - start.y) / 3.0);
            let control2 = Point::new(start.x + (end.x - start.x) * 2.0 / 3.0, start.y + (end.y - start.y) * 2.0 / 3.0);
            CurveSegment::Bezier {
                start,
                control1,
                control2,
                end,
            }
        })
        .collect()
}

fn apply_weight_simulation(raster: &Raster, paths: Vec<Polyline>, advanced: &AdvancedOptions) -> Vec<Polyline> {
    paths
        .into_iter()
        .flat_map(|path| {
            let weight = analyze_weight(raster, &path, WeightContext::Detail);
            let weighted = WeightedPath {
                centerline: path,
                weight,
                style: advanced.line_weight_style,
            };
            simulate(&weighted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_raster(w: u32, h: u32) -> Raster {
        let mut pixels = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                let block = ((x / 4) + (y / 4)) % 2;
                let v = if block == 0 { 20u8 } else { 230u8 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(w, h, pixels).unwrap()
    }

    #[test]
    fn rejects_invalid_options() {
        let raster = checkerboard_raster(8, 8);
        let mut options = Options::default();
        options.num_colors = 1;
        let result = process(&raster, Mode::ColorRegions, &options, &AdvancedOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn color_regions_mode_produces_paths() {
        let raster = checkerboard_raster(32, 32);
        let options = Options {
            num_colors: 2,
            ..Options::default()
        };
        let paths = process(&raster, Mode::ColorRegions, &options, &AdvancedOptions::default()).unwrap();
        assert!(!paths.is_empty());
    }

    #[test]
    fn centerline_mode_produces_paths() {
        let raster = checkerboard_raster(32, 32);
        let options = Options::default();
        let paths = process(&raster, Mode::Centerline, &options, &AdvancedOptions::default()).unwrap();
        // A checkerboard has plenty of dark runs to stitch.
        assert!(!paths.is_empty());
    }

    #[test]
    fn hatching_mode_ignores_variable_weight() {
        let raster = checkerboard_raster(32, 32);
        let options = Options::default();
        let mut advanced = AdvancedOptions::default();
        advanced.enable_variable_weight = true;
        // Should not panic and should not attempt weight simulation.
        let _ = process(&raster, Mode::Hatching, &options, &advanced).unwrap();
    }

    #[test]
    fn process_with_curves_without_fitting_preserves_endpoints() {
        let raster = checkerboard_raster(32, 32);
        let options = Options {
            num_colors: 2,
            ..Options::default()
        };
        let curves = process_with_curves(&raster, Mode::ColorRegions, &options, &AdvancedOptions::default()).unwrap();
        assert!(!curves.is_empty());
    }

    #[test]
    fn process_with_curves_and_fitting_enabled() {
        let raster = checkerboard_raster(32, 32);
        let options = Options {
            num_colors: 2,
            ..Options::default()
        };
        let mut advanced = AdvancedOptions::default();
        advanced.enable_curve_fitting = true;
        let curves = process_with_curves(&raster, Mode::ColorRegions, &options, &advanced).unwrap();
        assert!(!curves.is_empty());
    }
}
