//! Parallel hatching: straight strokes scanned across the mask at a fixed
//! angle and spacing (spec.md §4.5 Parallel).

use crate::geometry::{Point, Polyline};
use crate::raster::Mask;

/// Generate parallel hatch strokes clipped to `mask`.
pub fn generate(mask: &Mask, width: u32, height: u32, base_spacing: f64, angle_degrees: f64, intensity: f64) -> Vec<Polyline> {
    scan_lines(mask, width, height, base_spacing, angle_degrees, intensity)
}

/// Shared line-scanning routine: rotates the sampling axis by `angle_degrees`
/// and walks parallel offset lines spacing `base_spacing / max(0.3, intensity)`
/// apart, emitting maximal in-mask runs as polylines. Reused by the cross
/// hatcher, which calls this once per layer with its own spacing/angle.
pub(super) fn scan_lines(
    mask: &Mask,
    width: u32,
    height: u32,
    base_spacing: f64,
    angle_degrees: f64,
    intensity: f64,
) -> Vec<Polyline> {
    let effective_spacing = (base_spacing / intensity.max(0.3)).max(1e-6);
    let diag = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
    let angle = angle_degrees.to_radians();
    let dir = Point::new(angle.cos(), angle.sin());
    let normal = Point::new(-angle.sin(), angle.cos());
    let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);

    let num_samples = (2.0 * diag).floor() as i64;
    if num_samples < 2 {
        return Vec::new();
    }

    let mut paths = Vec::new();
    let mut offset = -diag;
    while offset <= diag {
        let line_center = Point::new(center.x + offset * normal.x, center.y + offset * normal.y);
        let mut run: Vec<Point> = Vec::new();
        for i in 0..num_samples {
            let t = -diag + (2.0 * diag) * (i as f64 / num_samples as f64);
            let p = Point::new(line_center.x + t * dir.x, line_center.y + t * dir.y);
            if mask.sample(p.x, p.y) {
                run.push(p);
            } else {
                if run.len() >= 2 {
                    paths.push(std::mem::take(&mut run));
                }
                run.clear();
            }
        }
        if run.len() >= 2 {
            paths.push(run);
        }
        offset += effective_spacing;
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in y0..y1 {
            for x in x0..x1 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn emits_horizontal_strokes_inside_rectangle() {
        let mask = rect_mask(40, 40, 5, 5, 35, 35);
        let paths = generate(&mask, 40, 40, 4.0, 0.0, 1.0);
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.len() >= 2);
            for p in path {
                assert!(mask.sample(p.x, p.y));
            }
        }
    }

    #[test]
    fn empty_mask_produces_no_strokes() {
        let mask = Mask::new(20, 20);
        let paths = generate(&mask, 20, 20, 4.0, 30.0, 0.5);
        assert!(paths.is_empty());
    }
}
