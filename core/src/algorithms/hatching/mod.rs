//! Hatching extractor: quantizes grayscale into intensity levels and
//! dispatches each level's mask to the advanced hatcher (spec.md §4.4).

mod contour_hatch;
mod cross;
mod parallel;
mod stippling;

use crate::config::{HatchingStyle, Options};
use crate::geometry::Polyline;
use crate::random::PipelineSeed;
use crate::raster::{Mask, Raster};

/// Extract hatched paths across all intensity levels of `raster`.
pub fn extract(raster: &Raster, options: &Options, style: HatchingStyle, seed: PipelineSeed) -> Vec<Polyline> {
    let num_colors = options.num_colors;
    let step = 255.0 / num_colors as f64;
    let mut rng = seed.rng();

    log::debug!(
        "hatching: extracting style={style:?} num_colors={num_colors} spacing={} angle={}",
        options.hatch_spacing,
        options.hatch_angle
    );

    let mut paths = Vec::new();
    for level in 0..(num_colors - 1) {
        let mask = build_level_mask(raster, level, step);
        let intensity = 1.0 - (level as f64) / ((num_colors - 1) as f64);
        let level_paths = dispatch(
            &mask,
            raster.width(),
            raster.height(),
            style,
            options.hatch_spacing,
            options.hatch_angle,
            intensity,
            &mut rng,
        );
        paths.extend(level_paths);
    }

    log::debug!("hatching: emitted {} paths", paths.len());
    paths
}

fn build_level_mask(raster: &Raster, level: u32, step: f64) -> Mask {
    let width = raster.width();
    let height = raster.height();
    let cutoff = (level as f64 + 0.5) * step;
    let mut mask = Mask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if raster.gray(x, y) >= cutoff {
                mask.set(x, y, true);
            }
        }
    }
    mask
}

#[allow(clippy::too_many_arguments)]
fn dispatch(
    mask: &Mask,
    width: u32,
    height: u32,
    style: HatchingStyle,
    base_spacing: f64,
    angle: f64,
    intensity: f64,
    rng: &mut rand_chacha::ChaCha8Rng,
) -> Vec<Polyline> {
    match style {
        HatchingStyle::Parallel => parallel::generate(mask, width, height, base_spacing, angle, intensity),
        HatchingStyle::Cross => cross::generate(mask, width, height, base_spacing, angle, intensity, rng),
        HatchingStyle::Contour => contour_hatch::generate(mask, base_spacing, intensity),
        HatchingStyle::Stippling => stippling::generate(mask, width, height, base_spacing, intensity, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x as f64 / width as f64) * 255.0) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn quantizes_into_num_colors_minus_one_levels() {
        let raster = gradient_raster(60, 60);
        let options = Options {
            num_colors: 4,
            hatch_spacing: 4.0,
            hatch_angle: 0.0,
            ..Options::default()
        };
        let paths = extract(&raster, &options, HatchingStyle::Parallel, PipelineSeed::default());
        assert!(!paths.is_empty());
    }

    #[test]
    fn contour_style_runs_without_panicking() {
        let raster = gradient_raster(40, 40);
        let options = Options {
            num_colors: 3,
            hatch_spacing: 4.0,
            ..Options::default()
        };
        let _ = extract(&raster, &options, HatchingStyle::Contour, PipelineSeed::default());
    }

    #[test]
    fn stippling_style_runs_without_panicking() {
        let raster = gradient_raster(40, 40);
        let options = Options {
            num_colors: 3,
            hatch_spacing: 4.0,
            ..Options::default()
        };
        let _ = extract(&raster, &options, HatchingStyle::Stippling, PipelineSeed::default());
    }
}
