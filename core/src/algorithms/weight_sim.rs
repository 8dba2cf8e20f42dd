//! Variable line-weight simulator: renders a weighted centerline as one or
//! more offset copies per style (spec.md §4.7).

use crate::config::WeightStyle;
use crate::geometry::{distance, normal, Point, Polyline};
use crate::random::Lcg;
use crate::raster::Raster;

/// A centerline annotated with a drawing weight. `weight == 1.0` is
/// neutral; `< 1.0` is thin (rendered as the bare centerline); `> 1.0` is
/// thick and dispatches to `style`'s multi-line rendering.
#[derive(Debug, Clone)]
pub struct WeightedPath {
    pub centerline: Polyline,
    pub weight: f64,
    pub style: WeightStyle,
}

/// Render `path` into one or more polylines.
pub fn simulate(path: &WeightedPath) -> Vec<Polyline> {
    if path.weight <= 1.0 || path.centerline.len() < 2 {
        return vec![path.centerline.clone()];
    }

    let thickness = (path.weight - 1.0) * 2.0;
    match path.style {
        WeightStyle::Parallel => parallel_weight(&path.centerline, thickness, path.weight),
        WeightStyle::Outline => outline_weight(&path.centerline, thickness),
        WeightStyle::Scribble => scribble_weight(&path.centerline, thickness),
        WeightStyle::Zigzag => zigzag_weight(&path.centerline, thickness),
    }
}

/// Offset every vertex of `points` along its local unit normal. End
/// vertices use the adjacent edge's normal; interior vertices average the
/// two edge normals and renormalize. Offsets with `|offset| < 0.1` return
/// the input unchanged (spec.md §8 property 3).
pub fn offset_polyline(points: &[Point], offset: f64) -> Polyline {
    if offset.abs() < 0.1 || points.len() < 2 {
        return points.to_vec();
    }
    let n = points.len();
    (0..n)
        .map(|i| {
            let vertex_normal = if i == 0 {
                normal(points[0], points[1])
            } else if i == n - 1 {
                normal(points[n - 2], points[n - 1])
            } else {
                let n1 = normal(points[i - 1], points[i]);
                let n2 = normal(points[i], points[i + 1]);
                let avg = Point::new((n1.x + n2.x) / 2.0, (n1.y + n2.y) / 2.0);
                let len = (avg.x * avg.x + avg.y * avg.y).sqrt();
                if len < 1e-12 {
                    n1
                } else {
                    Point::new(avg.x / len, avg.y / len)
                }
            };
            Point::new(points[i].x + offset * vertex_normal.x, points[i].y + offset * vertex_normal.y)
        })
        .collect()
}

fn parallel_weight(centerline: &Polyline, thickness: f64, weight: f64) -> Vec<Polyline> {
    let lines = ((weight * 2.0).ceil() as i64).max(1) as usize;
    let half = thickness / 2.0;
    (0..lines)
        .map(|i| {
            let offset = if lines == 1 {
                0.0
            } else {
                -half + (2.0 * half) * (i as f64 / (lines - 1) as f64)
            };
            offset_polyline(centerline, offset)
        })
        .collect()
}

fn outline_weight(centerline: &Polyline, thickness: f64) -> Vec<Polyline> {
    let half = thickness / 2.0;
    let mut paths = vec![offset_polyline(centerline, half), offset_polyline(centerline, -half)];

    let spacing = (thickness / 8.0).max(0.5);
    let mut offset = -half + spacing;
    while offset < half - 1e-9 {
        let line = offset_polyline(centerline, offset);
        paths.push(trim_fraction(&line, 0.1));
        offset += spacing;
    }
    paths
}

fn trim_fraction(path: &Polyline, fraction: f64) -> Polyline {
    let n = path.len();
    if n < 3 {
        return path.to_vec();
    }
    let drop = ((fraction * n as f64).round() as usize).min(n / 2);
    let end = n - drop;
    if end <= drop + 1 {
        return path.to_vec();
    }
    path[drop..end].to_vec()
}

fn scribble_weight(centerline: &Polyline, thickness: f64) -> Vec<Polyline> {
    let copies = (thickness.min(4.0) * 3.0).ceil().max(0.0) as u32;
    let jitter_amount = thickness / 4.0;
    let mut paths = vec![centerline.clone()];

    for copy_index in 0..copies {
        let mut lcg = Lcg::new(copy_index);
        let mut jittered = Vec::with_capacity(centerline.len());
        for (idx, &p) in centerline.iter().enumerate() {
            let jx = lcg.next_range(-jitter_amount, jitter_amount);
            let jy = lcg.next_range(-jitter_amount, jitter_amount);
            jittered.push(Point::new(p.x + jx, p.y + jy));

            if idx + 1 < centerline.len() && lcg.next_f64() < 0.3 {
                let next = centerline[idx + 1];
                jittered.push(Point::new((p.x + next.x) / 2.0, (p.y + next.y) / 2.0));
            }
        }
        paths.push(jittered);
    }
    paths
}

fn zigzag_weight(centerline: &Polyline, thickness: f64) -> Vec<Polyline> {
    let half = thickness / 2.0;
    let mut zigzag = vec![centerline[0]];
    let mut sign = 1.0;

    for window in centerline.windows(2) {
        let (a, b) = (window[0], window[1]);
        let seg_len = distance(a, b);
        let steps = ((seg_len / thickness.max(2.0)).floor() as i64).max(1) as usize;
        let edge_normal = normal(a, b);

        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            let base = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            let offset = half * sign;
            zigzag.push(Point::new(base.x + offset * edge_normal.x, base.y + offset * edge_normal.y));
            sign = -sign;
        }
    }

    vec![zigzag, offset_polyline(centerline, half), offset_polyline(centerline, -half)]
}

/// Context a weight-analysis sample is being taken for, per spec.md §4.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightContext {
    Outline,
    Detail,
    Fill,
}

/// Estimate a drawing weight for `path` from local pixel contrast, used
/// when the caller does not supply an explicit weight.
pub fn analyze_weight(raster: &Raster, path: &Polyline, context: WeightContext) -> f64 {
    if path.is_empty() {
        return 1.0;
    }
    let sample_count = path.len().min(10);
    let mut contrasts = Vec::new();
    for i in 0..sample_count {
        let idx = if sample_count == 1 {
            0
        } else {
            i * (path.len() - 1) / (sample_count - 1)
        };
        if let Some(c) = local_contrast(raster, path[idx]) {
            contrasts.push(c);
        }
    }
    let mean_contrast = if contrasts.is_empty() {
        0.0
    } else {
        contrasts.iter().sum::<f64>() / contrasts.len() as f64
    };

    match context {
        WeightContext::Outline => 1.0 + 2.0 * mean_contrast,
        WeightContext::Detail => 1.0 + mean_contrast,
        WeightContext::Fill => (1.0 - 0.5 * mean_contrast).max(0.5),
    }
}

fn local_contrast(raster: &Raster, p: Point) -> Option<f64> {
    let cx = p.x.round() as i64;
    let cy = p.y.round() as i64;
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    let mut any = false;

    for dy in -1..=1 {
        for dx in -1..=1 {
            let x = cx + dx;
            let y = cy + dy;
            if x < 0 || y < 0 || x as u32 >= raster.width() || y as u32 >= raster.height() {
                continue;
            }
            let g = raster.gray(x as u32, y as u32);
            min_v = min_v.min(g);
            max_v = max_v.max(g);
            any = true;
        }
    }
    if !any {
        return None;
    }
    Some((max_v - min_v) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_centerline() -> Polyline {
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)]
    }

    #[test]
    fn zero_offset_is_identity() {
        let points = sample_centerline();
        let offset = offset_polyline(&points, 0.0);
        assert_eq!(offset, points);
    }

    #[test]
    fn neutral_weight_returns_single_centerline() {
        let path = WeightedPath {
            centerline: sample_centerline(),
            weight: 1.0,
            style: WeightStyle::Parallel,
        };
        let result = simulate(&path);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], path.centerline);
    }

    #[test]
    fn parallel_style_emits_multiple_lines_for_heavy_weight() {
        let path = WeightedPath {
            centerline: sample_centerline(),
            weight: 3.0,
            style: WeightStyle::Parallel,
        };
        let result = simulate(&path);
        assert!(result.len() > 1);
    }

    #[test]
    fn scribble_style_emits_original_plus_copies() {
        let path = WeightedPath {
            centerline: sample_centerline(),
            weight: 2.0,
            style: WeightStyle::Scribble,
        };
        let result = simulate(&path);
        assert!(result.len() > 1);
        assert_eq!(result[0], path.centerline);
    }

    #[test]
    fn zigzag_style_alternates_sides() {
        let path = WeightedPath {
            centerline: sample_centerline(),
            weight: 3.0,
            style: WeightStyle::Zigzag,
        };
        let result = simulate(&path);
        assert_eq!(result.len(), 3);
        assert!(result[0].len() > 2);
    }

    #[test]
    fn weight_analysis_returns_neutral_for_uniform_image() {
        let pixels = vec![128u8; 10 * 10 * 4];
        let raster = Raster::new(10, 10, pixels).unwrap();
        let path = vec![Point::new(5.0, 5.0)];
        let w = analyze_weight(&raster, &path, WeightContext::Detail);
        assert!((w - 1.0).abs() < 1e-9);
    }
}
