//! Curve fitter: greedy-window Bezier fitting with control-point
//! refinement, and optional arc conversion (spec.md §4.6).

use crate::curve::{evaluate_cubic_bezier, CurveSegment};
use crate::geometry::{distance, Point, Polyline};

const MAX_WINDOW: usize = 20;
const REFINE_ITERATIONS: u32 = 5;
const REFINE_STEP: f64 = 0.5;
const CONTROL_FRACTION: f64 = 0.3;
const ARC_SAMPLE_COUNT: usize = 11;
const CIRCLE_FIT_DEGENERACY_EPS: f64 = 1e-10;

/// Fit `points` to a sequence of cubic Beziers, each with RMS error at most
/// `tolerance` against its source window.
pub fn fit_curves(points: &Polyline, tolerance: f64) -> Vec<CurveSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut curves = Vec::new();
    let mut i = 0;

    while i < n - 1 {
        let max_len = (n - i).min(MAX_WINDOW);
        let mut accepted: Option<(usize, CurveSegment)> = None;

        for window_len in (2..=max_len).rev() {
            let end_idx = i + window_len - 1;
            let window = &points[i..=end_idx];
            let (start, c1, c2, end) = fit_window(window);
            let (c1, c2, err) = refine_controls(start, c1, c2, end, window);
            if err <= tolerance {
                accepted = Some((
                    end_idx,
                    CurveSegment::Bezier {
                        start,
                        control1: c1,
                        control2: c2,
                        end,
                    },
                ));
                break;
            }
        }

        match accepted {
            Some((end_idx, curve)) => {
                curves.push(curve);
                i = end_idx;
            }
            None => {
                let end_idx = (i + 2).min(n - 1);
                let start = points[i];
                let end = points[end_idx];
                let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
                curves.push(CurveSegment::Bezier {
                    start,
                    control1: mid,
                    control2: mid,
                    end,
                });
                i = end_idx;
            }
        }
    }

    curves
}

/// Fit `points` to curve segments, converting Beziers to circular arcs
/// where the fit is within `tolerance` when `enable_arc_conversion` is set.
pub fn fit_curves_with_arcs(points: &Polyline, tolerance: f64, enable_arc_conversion: bool) -> Vec<CurveSegment> {
    let beziers = fit_curves(points, tolerance);
    if !enable_arc_conversion {
        return beziers;
    }
    beziers
        .into_iter()
        .map(|bezier| try_arc_conversion(&bezier, tolerance).unwrap_or(bezier))
        .collect()
}

fn fit_window(window: &[Point]) -> (Point, Point, Point, Point) {
    let start = window[0];
    let end = *window.last().unwrap();
    let chord = distance(start, end);
    let tangent_start = estimate_tangent(window, 0);
    let tangent_end = estimate_tangent(window, window.len() - 1);
    let control1 = Point::new(
        start.x + tangent_start.x * CONTROL_FRACTION * chord,
        start.y + tangent_start.y * CONTROL_FRACTION * chord,
    );
    let control2 = Point::new(
        end.x - tangent_end.x * CONTROL_FRACTION * chord,
        end.y - tangent_end.y * CONTROL_FRACTION * chord,
    );
    (start, control1, control2, end)
}

/// Forward difference at the start, backward difference at the end,
/// central difference everywhere else.
fn estimate_tangent(window: &[Point], idx: usize) -> Point {
    let n = window.len();
    let (a, b) = if idx == 0 {
        (window[0], window[1])
    } else if idx == n - 1 {
        (window[n - 2], window[n - 1])
    } else {
        (window[idx - 1], window[idx + 1])
    };
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        Point::new(1.0, 0.0)
    } else {
        Point::new(dx / len, dy / len)
    }
}

fn rms_error(start: Point, c1: Point, c2: Point, end: Point, window: &[Point]) -> f64 {
    let m = window.len();
    let mut sum_sq = 0.0;
    for (j, &p) in window.iter().enumerate() {
        let t = j as f64 / (m - 1) as f64;
        let sample = evaluate_cubic_bezier(start, c1, c2, end, t);
        sum_sq += distance(sample, p).powi(2);
    }
    (sum_sq / m as f64).sqrt()
}

/// Five iterations of exhaustive 3x3 perturbation (step 0.5 in each axis),
/// refining each control point independently and keeping only improvements.
fn refine_controls(start: Point, mut c1: Point, mut c2: Point, end: Point, window: &[Point]) -> (Point, Point, f64) {
    let steps = [-REFINE_STEP, 0.0, REFINE_STEP];
    let mut best_err = rms_error(start, c1, c2, end, window);

    for _ in 0..REFINE_ITERATIONS {
        let mut best_c1 = c1;
        for &dx in &steps {
            for &dy in &steps {
                let candidate = Point::new(c1.x + dx, c1.y + dy);
                let err = rms_error(start, candidate, c2, end, window);
                if err < best_err {
                    best_err = err;
                    best_c1 = candidate;
                }
            }
        }
        c1 = best_c1;

        let mut best_c2 = c2;
        for &dx in &steps {
            for &dy in &steps {
                let candidate = Point::new(c2.x + dx, c2.y + dy);
                let err = rms_error(start, c1, candidate, end, window);
                if err < best_err {
                    best_err = err;
                    best_c2 = candidate;
                }
            }
        }
        c2 = best_c2;
    }

    (c1, c2, best_err)
}

fn try_arc_conversion(bezier: &CurveSegment, tolerance: f64) -> Option<CurveSegment> {
    let (start, end) = match bezier {
        CurveSegment::Bezier { start, end, .. } => (*start, *end),
        CurveSegment::Arc { .. } => return None,
    };

    let samples: Vec<Point> = (0..ARC_SAMPLE_COUNT)
        .map(|i| bezier.evaluate(i as f64 / (ARC_SAMPLE_COUNT - 1) as f64))
        .collect();

    let (center, radius) = fit_circle(&samples)?;
    let max_deviation = samples
        .iter()
        .map(|p| (distance(*p, center) - radius).abs())
        .fold(0.0, f64::max);

    if max_deviation > tolerance {
        return None;
    }

    let mid = bezier.evaluate(0.5);
    let v1 = Point::new(mid.x - start.x, mid.y - start.y);
    let v2 = Point::new(end.x - start.x, end.y - start.y);
    let cross = v1.x * v2.y - v1.y * v2.x;
    let clockwise = cross < 0.0;

    Some(CurveSegment::Arc {
        start,
        end,
        center,
        radius,
        clockwise,
    })
}

/// Algebraic (Kasa) least-squares circle fit: solve the 3x3 normal
/// equations for `x^2 + y^2 + Dx + Ey + F = 0`. Returns `None` for a
/// degenerate (near-singular) fit, per spec.md §4.6.
fn fit_circle(points: &[Point]) -> Option<(Point, f64)> {
    let n = points.len() as f64;
    let (mut suu, mut suv, mut svv, mut su, mut sv) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut suuu, mut svvv, mut suvv, mut suuv) = (0.0, 0.0, 0.0, 0.0);

    for p in points {
        let (x, y) = (p.x, p.y);
        suu += x * x;
        suv += x * y;
        svv += y * y;
        su += x;
        sv += y;
        suuu += x * x * x;
        svvv += y * y * y;
        suvv += x * y * y;
        suuv += x * x * y;
    }

    let a = [[suu, suv, su], [suv, svv, sv], [su, sv, n]];
    let b = [-(suuu + suvv), -(svvv + suuv), -(suu + svv)];
    let [d, e, f] = solve_least_squares_3x3(a, b)?;

    let center = Point::new(-d / 2.0, -e / 2.0);
    let radius_sq = (d * d + e * e) / 4.0 - f;
    if radius_sq <= 0.0 {
        return None;
    }
    Some((center, radius_sq.sqrt()))
}

fn solve_least_squares_3x3(a: [[f64; 3]; 3], b: [f64; 3]) -> Option<[f64; 3]> {
    let det = determinant3(a);
    if det.abs() < CIRCLE_FIT_DEGENERACY_EPS {
        return None;
    }
    let mut x = [0.0; 3];
    for (col, slot) in x.iter_mut().enumerate() {
        let mut a_col = a;
        for row in 0..3 {
            a_col[row][col] = b[row];
        }
        *slot = determinant3(a_col) / det;
    }
    Some(x)
}

fn determinant3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_preserved_across_windows() {
        // S5 from spec.md
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, -1.0),
            Point::new(4.0, 0.0),
        ];
        let curves = fit_curves(&points, 0.1);
        assert!(!curves.is_empty());
        assert_eq!(curves.first().unwrap().start(), Point::new(0.0, 0.0));
        assert_eq!(curves.last().unwrap().end(), Point::new(4.0, 0.0));
    }

    #[test]
    fn straight_line_fits_within_tight_tolerance() {
        let points: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 0.0)).collect();
        let curves = fit_curves(&points, 0.01);
        assert_eq!(curves.len(), 1);
    }

    #[test]
    fn arc_conversion_recovers_a_circle() {
        let center = Point::new(50.0, 50.0);
        let radius = 30.0;
        let points: Vec<Point> = (0..12)
            .map(|i| {
                let theta = std::f64::consts::PI * (i as f64) / 11.0;
                Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
            })
            .collect();
        let curves = fit_curves_with_arcs(&points, 1.0, true);
        assert!(curves.iter().any(|c| matches!(c, CurveSegment::Arc { .. })));

        // Property 7 (spec.md §8): every emitted arc's own endpoints stay
        // within `tolerance` of `radius` from `center`.
        for curve in &curves {
            if let CurveSegment::Arc { start, end, center, radius, .. } = curve {
                assert!(crate::curve::arc_radius_consistency(*start, *end, *center, *radius) <= 1.0);
            }
        }
    }

    #[test]
    fn degenerate_circle_fit_keeps_bezier() {
        let bezier = CurveSegment::Bezier {
            start: Point::new(0.0, 0.0),
            control1: Point::new(1.0, 0.0),
            control2: Point::new(2.0, 0.0),
            end: Point::new(3.0, 0.0),
        };
        // Collinear samples make the circle fit singular.
        assert!(try_arc_conversion(&bezier, 0.1).is_none());
    }
}
