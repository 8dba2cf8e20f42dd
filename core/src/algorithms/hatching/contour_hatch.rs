//! Contour hatching: concentric inward offsets of the mask's own
//! contours (spec.md §4.5 Contour).
//!
//! The per-vertex normal offset used here is the numerically weakest step
//! in the whole pipeline (spec.md §9): it can self-intersect on concave
//! regions. That artifact is accepted for this artistic style; no polygon
//! clipping is attempted.

use crate::algorithms::contour::trace_external_contours;
use crate::geometry::{normal, Point, Polyline};
use crate::raster::Mask;

pub fn generate(mask: &Mask, base_spacing: f64, intensity: f64) -> Vec<Polyline> {
    let spacing = base_spacing / (0.3 + 0.7 * intensity);
    let layers = (intensity * 8.0).ceil().max(1.0) as u32;
    let contours = trace_external_contours(mask);

    let mut paths = Vec::new();
    for contour in &contours {
        for layer in 0..layers {
            let offset_amount = -(layer as f64) * spacing;
            let offset = offset_contour(contour, offset_amount);
            let smoothed = smooth_cyclic(&smooth_cyclic(&offset));
            if smoothed.len() >= 3 {
                paths.push(smoothed);
            }
        }
    }
    paths
}

/// Offset every vertex along the renormalized average of its two adjacent
/// edge normals (the bisector direction).
fn offset_contour(points: &[Point], amount: f64) -> Polyline {
    let n = points.len();
    if n < 3 || amount == 0.0 {
        return points.to_vec();
    }
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let n1 = normal(prev, cur);
            let n2 = normal(cur, next);
            let avg = Point::new((n1.x + n2.x) / 2.0, (n1.y + n2.y) / 2.0);
            let len = (avg.x * avg.x + avg.y * avg.y).sqrt();
            let unit = if len < 1e-12 { n1 } else { Point::new(avg.x / len, avg.y / len) };
            Point::new(cur.x + amount * unit.x, cur.y + amount * unit.y)
        })
        .collect()
}

/// One pass of cyclic `(1, 2, 1)/4` weighted-mean smoothing.
fn smooth_cyclic(points: &[Point]) -> Polyline {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            Point::new(
                (prev.x + 2.0 * cur.x + next.x) / 4.0,
                (prev.y + 2.0 * cur.y + next.y) / 4.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask() -> Mask {
        let mut mask = Mask::new(20, 20);
        for y in 4..16 {
            for x in 4..16 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn emits_at_least_one_layer_per_contour() {
        let mask = square_mask();
        let paths = generate(&mask, 4.0, 0.5);
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.len() >= 3);
        }
    }

    #[test]
    fn smoothing_preserves_point_count() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let smoothed = smooth_cyclic(&points);
        assert_eq!(smoothed.len(), points.len());
    }
}
