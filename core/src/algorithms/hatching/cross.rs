//! Cross hatching: layered parallel scans at cycling angles, with
//! inner layers symmetrically trimmed (spec.md §4.5 Cross).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::Polyline;
use crate::raster::Mask;

use super::parallel::scan_lines;

const ANGLE_OFFSETS: [f64; 4] = [0.0, 90.0, 45.0, 135.0];

pub fn generate(
    mask: &Mask,
    width: u32,
    height: u32,
    base_spacing: f64,
    angle_degrees: f64,
    intensity: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<Polyline> {
    let layers = (intensity * 4.0).ceil().max(1.0) as u32;
    let mut paths = Vec::new();

    for layer in 0..layers {
        let angle = angle_degrees + ANGLE_OFFSETS[(layer as usize) % ANGLE_OFFSETS.len()];
        let spacing = base_spacing * (1.0 + 0.3 * layer as f64);
        let layer_paths = scan_lines(mask, width, height, spacing, angle, 1.0);

        if layer == 0 {
            paths.extend(layer_paths);
        } else {
            for path in layer_paths {
                // Open question in spec.md §9: a random factor in [0.8, 1.2]
                // cannot extend a sub-segment past 1.0, so it is clamped with
                // min(1, factor) rather than reinterpreted as [0.8, 1.0].
                let factor = rng.gen_range(0.8..=1.2f64).min(1.0);
                paths.push(trim_symmetric(&path, factor));
            }
        }
    }

    paths
}

fn trim_symmetric(path: &Polyline, factor: f64) -> Polyline {
    if factor >= 1.0 || path.len() < 3 {
        return path.clone();
    }
    let n = path.len();
    let drop_each_end = (((1.0 - factor) / 2.0) * n as f64).round() as usize;
    let start = drop_each_end.min(n / 2);
    let end = n - start;
    if end <= start + 1 {
        return path.clone();
    }
    path[start..end].to_vec()
}
