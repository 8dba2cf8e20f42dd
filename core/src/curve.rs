//! Curve segment representation: cubic Beziers and circular arcs.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::geometry::{distance, Point};

/// A single output curve segment: either a cubic Bezier or a circular arc.
/// Downstream consumers match exhaustively on this tag rather than relying
/// on runtime type discrimination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveSegment {
    Bezier {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Arc {
        start: Point,
        end: Point,
        center: Point,
        radius: f64,
        clockwise: bool,
    },
}

impl CurveSegment {
    pub fn start(&self) -> Point {
        match self {
            CurveSegment::Bezier { start, .. } => *start,
            CurveSegment::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            CurveSegment::Bezier { end, .. } => *end,
            CurveSegment::Arc { end, .. } => *end,
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    ///
    /// For a Bezier this is the standard cubic Bernstein-basis evaluation;
    /// `evaluate(0) == start` and `evaluate(1) == end` exactly. For an arc
    /// this interpolates the subtended angle from `start` to `end` around
    /// `center`, honoring `clockwise`.
    pub fn evaluate(&self, t: f64) -> Point {
        match self {
            CurveSegment::Bezier {
                start,
                control1,
                control2,
                end,
            } => evaluate_cubic_bezier(*start, *control1, *control2, *end, t),
            CurveSegment::Arc {
                start,
                end,
                center,
                radius,
                clockwise,
            } => {
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                let a1 = (end.y - center.y).atan2(end.x - center.x);
                let mut delta = a1 - a0;
                if *clockwise {
                    if delta > 0.0 {
                        delta -= TAU;
                    }
                } else if delta < 0.0 {
                    delta += TAU;
                }
                let angle = a0 + delta * t;
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            }
        }
    }
}

/// Evaluate a cubic Bezier `(1-t)^3 p0 + 3(1-t)^2 t p1 + 3(1-t) t^2 p2 + t^3 p3`.
pub fn evaluate_cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;
    Point::new(
        mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
        mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
    )
}

/// Maximum deviation of `arc`'s own endpoints/center from `radius`, used to
/// check the arc invariant in spec.md §3 and property 7 in spec.md §8.
pub fn arc_radius_consistency(start: Point, end: Point, center: Point, radius: f64) -> f64 {
    (distance(start, center) - radius)
        .abs()
        .max((distance(end, center) - radius).abs())
}
