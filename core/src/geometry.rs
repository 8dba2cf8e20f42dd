//! Geometry primitives: points, distances, normals, and Douglas-Peucker
//! polyline simplification.

use serde::{Deserialize, Serialize};

/// A 2D coordinate in image/canvas units (origin top-left, y downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A non-empty ordered sequence of points, interpreted as a connected open
/// polyline. A polyline with fewer than 2 points is not a drawable path.
pub type Polyline = Vec<Point>;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Perpendicular distance from `p` to the infinite line through `a`, `b`.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let coeff_a = b.y - a.y;
    let coeff_b = a.x - b.x;
    let coeff_c = b.x * a.y - a.x * b.y;
    let denom = (coeff_a * coeff_a + coeff_b * coeff_b).sqrt();
    if denom < 1e-12 {
        return distance(p, a);
    }
    (coeff_a * p.x + coeff_b * p.y + coeff_c).abs() / denom
}

/// Unit vector perpendicular (90 degrees counter-clockwise) to `b - a`.
/// Returns `(0, 1)` when `a == b`.
pub fn normal(a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        return Point::new(0.0, 1.0);
    }
    // 90 degree CCW rotation of (dx, dy) in a y-down frame is (dy, -dx).
    Point::new(dy / len, -dx / len)
}

/// Douglas-Peucker polyline simplification.
///
/// Input of 2 or fewer points is returned verbatim. Output has at least 2
/// points whenever the input does.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Polyline {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let start = points[0];
    let end = *points.last().unwrap();

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(p, start, end);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }

    if max_dist > epsilon {
        let mut left = douglas_peucker(&points[..=max_index], epsilon);
        let right = douglas_peucker(&points[max_index..], epsilon);
        left.pop(); // avoid duplicating the shared point
        left.extend(right);
        left
    } else {
        vec![start, end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn normal_of_degenerate_segment_is_default() {
        let p = Point::new(5.0, 5.0);
        let n = normal(p, p);
        assert_eq!(n, Point::new(0.0, 1.0));
    }

    #[test]
    fn normal_is_unit_and_perpendicular() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let n = normal(a, b);
        assert!((n.x * n.x + n.y * n.y - 1.0).abs() < 1e-9);
        // horizontal segment -> vertical normal
        assert!(n.x.abs() < 1e-9);
    }

    #[test]
    fn dp_line_s4() {
        // S4 from spec.md
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.1),
            Point::new(2.0, 0.0),
            Point::new(3.0, -0.1),
            Point::new(10.0, 0.0),
        ];
        let simplified = douglas_peucker(&points, 0.5);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn dp_short_input_returned_verbatim() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(douglas_peucker(&points, 0.01), points);
        let single = vec![Point::new(0.0, 0.0)];
        assert_eq!(douglas_peucker(&single, 0.01), single);
    }

    #[test]
    fn dp_is_idempotent() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 5.0),
            Point::new(2.0, 0.2),
            Point::new(3.0, 6.0),
            Point::new(4.0, 0.0),
            Point::new(5.0, 4.9),
            Point::new(6.0, 0.1),
        ];
        let once = douglas_peucker(&points, 1.0);
        let twice = douglas_peucker(&once, 1.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn dp_output_has_min_two_points() {
        let points: Vec<Point> = (0..20).map(|i| Point::new(i as f64, 0.0)).collect();
        let simplified = douglas_peucker(&points, 100.0);
        assert!(simplified.len() >= 2);
    }
}
