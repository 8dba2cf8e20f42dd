//! Color-region extractor: k-means color quantization followed by
//! per-cluster contour tracing (spec.md §4.2).

use crate::algorithms::contour::trace_external_contours;
use crate::algorithms::kmeans::kmeans_rgb;
use crate::config::Options;
use crate::geometry::{douglas_peucker, Polyline};
use crate::random::PipelineSeed;
use crate::raster::{Mask, Raster};

const MAX_ITERATIONS: u32 = 20;
const CONVERGENCE_EPS: f64 = 1.0;
const RESTARTS: u32 = 10;
const MIN_RAW_CONTOUR_POINTS: usize = 10;
const SIMPLIFY_EPSILON: f64 = 2.0;
const MIN_SIMPLIFIED_POINTS: usize = 3;

/// Extract one polyline per simplified contour of each color cluster,
/// ordered by ascending cluster index, then contour discovery order within
/// that cluster. Never fails: k-means or extraction problems are
/// neutralized with a thresholded fallback and logged, per spec.md §7.
pub fn extract(raster: &Raster, options: &Options, seed: PipelineSeed) -> Vec<Polyline> {
    log::debug!(
        "color_regions: extracting with num_colors={} on {}x{}",
        options.num_colors,
        raster.width(),
        raster.height()
    );

    let pixels = collect_rgb_pixels(raster);
    let mut rng = seed.rng();
    let kmeans = kmeans_rgb(
        &pixels,
        options.num_colors,
        MAX_ITERATIONS,
        CONVERGENCE_EPS,
        RESTARTS,
        &mut rng,
    );

    let paths = match kmeans {
        Some(result) if !result.labels.is_empty() => {
            extract_from_labels(raster, &result.labels, options.num_colors)
        }
        _ => {
            log::warn!("color_regions: k-means failed or produced no labels, falling back to threshold extraction");
            extract_from_threshold_fallback(raster)
        }
    };

    log::debug!("color_regions: emitted {} paths", paths.len());
    paths
}

fn collect_rgb_pixels(raster: &Raster) -> Vec<(u8, u8, u8)> {
    let mut pixels = Vec::with_capacity(raster.width() as usize * raster.height() as usize);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let [r, g, b] = raster.rgb(x, y);
            pixels.push((r, g, b));
        }
    }
    pixels
}

fn extract_from_labels(raster: &Raster, labels: &[u32], num_colors: u32) -> Vec<Polyline> {
    let width = raster.width();
    let height = raster.height();
    let mut paths = Vec::new();

    for cluster in 0..num_colors {
        let mut mask = Mask::new(width, height);
        let mut any = false;
        for y in 0..height {
            for x in 0..width {
                let idx = (y as usize) * (width as usize) + (x as usize);
                if labels[idx] == cluster {
                    mask.set(x, y, true);
                    any = true;
                }
            }
        }
        if !any {
            continue;
        }

        for raw_contour in trace_external_contours(&mask) {
            if raw_contour.len() < MIN_RAW_CONTOUR_POINTS {
                continue;
            }
            let simplified = douglas_peucker(&raw_contour, SIMPLIFY_EPSILON);
            if simplified.len() < MIN_SIMPLIFIED_POINTS {
                continue;
            }
            paths.push(simplified);
        }
    }

    paths
}

fn extract_from_threshold_fallback(raster: &Raster) -> Vec<Polyline> {
    let width = raster.width();
    let height = raster.height();
    let threshold = otsu_threshold(raster).unwrap_or(128.0);

    let mut mask = Mask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if raster.gray(x, y) < threshold {
                mask.set(x, y, true);
            }
        }
    }

    let mut paths = Vec::new();
    for raw_contour in trace_external_contours(&mask) {
        if raw_contour.len() < MIN_RAW_CONTOUR_POINTS {
            continue;
        }
        let simplified = douglas_peucker(&raw_contour, SIMPLIFY_EPSILON);
        if simplified.len() < MIN_SIMPLIFIED_POINTS {
            continue;
        }
        paths.push(simplified);
    }
    paths
}

/// Otsu's method: choose the grayscale threshold maximizing inter-class
/// variance. Returns `None` for a degenerate (single-valued) histogram, in
/// which case callers fall back to the fixed value 128.
fn otsu_threshold(raster: &Raster) -> Option<f64> {
    let mut histogram = [0u64; 256];
    let mut total = 0u64;
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let g = raster.gray(x, y).round().clamp(0.0, 255.0) as usize;
            histogram[g] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return None;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut sum_background = 0.0;
    let mut weight_background = 0u64;
    let mut best_variance = -1.0;
    let mut best_threshold = None;

    for t in 0..256 {
        weight_background += histogram[t];
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }
        sum_background += t as f64 * histogram[t] as f64;

        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let variance_between = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if variance_between > best_variance {
            best_variance = variance_between;
            best_threshold = Some(t as f64);
        }
    }

    best_threshold
}
