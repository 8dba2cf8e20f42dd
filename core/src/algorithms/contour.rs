//! Shared 4-connected external contour tracer.
//!
//! Used by both the color-region extractor (spec.md §4.2) and the contour
//! hatching style (spec.md §4.5) to turn a binary mask into polylines. Each
//! 4-connected foreground blob is traced with Moore-neighbor boundary
//! following, then compressed `CHAIN_APPROX_SIMPLE`-style so only the
//! corner/vertex points of piecewise-axis-aligned runs survive.

use crate::geometry::Point;
use crate::raster::Mask;

/// Moore-neighborhood offsets in clockwise order starting from north.
const CLOCKWISE_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Trace the external contour of every 4-connected foreground blob in
/// `mask`. Blobs are discovered in top-to-bottom, left-to-right scan order;
/// within a blob, contour points follow the order Moore-neighbor tracing
/// visits them starting from the blob's topmost-then-leftmost pixel.
pub fn trace_external_contours(mask: &Mask) -> Vec<Vec<Point>> {
    let width = mask.width() as i64;
    let height = mask.height() as i64;
    let labels = label_components(mask);

    let mut contours = Vec::new();
    let mut seen_labels = vec![false; labels.next_label as usize];

    for y in 0..height {
        for x in 0..width {
            let label = labels.get(x, y);
            if label < 0 {
                continue;
            }
            let label = label as usize;
            if seen_labels[label] {
                continue;
            }
            seen_labels[label] = true;

            let raw = trace_one_boundary(&labels, x, y, width, height);
            contours.push(compress_collinear(&raw));
        }
    }

    contours
}

struct ComponentLabels {
    width: i64,
    height: i64,
    data: Vec<i32>,
    next_label: i32,
}

impl ComponentLabels {
    #[inline]
    fn get(&self, x: i64, y: i64) -> i32 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return -1;
        }
        self.data[(y * self.width + x) as usize]
    }
}

/// 4-connected flood fill labeling, in scan order, so label 0 is the first
/// blob whose topmost row is reached first.
fn label_components(mask: &Mask) -> ComponentLabels {
    let width = mask.width() as i64;
    let height = mask.height() as i64;
    let mut data = vec![-1; (width * height) as usize];
    let mut next_label = 0i32;
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if !mask.get(x as u32, y as u32) || data[idx] != -1 {
                continue;
            }
            let label = next_label;
            next_label += 1;
            data[idx] = label;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    let nx = cx + dx;
                    let ny = cy + dy;
                    if nx < 0 || ny < 0 || nx >= width || ny >= height {
                        continue;
                    }
                    let nidx = (ny * width + nx) as usize;
                    if mask.get(nx as u32, ny as u32) && data[nidx] == -1 {
                        data[nidx] = label;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    ComponentLabels {
        width,
        height,
        data,
        next_label,
    }
}

/// Moore-neighbor boundary trace of the blob labeled at `(start_x, start_y)`,
/// which must be that blob's topmost-then-leftmost pixel.
fn trace_one_boundary(
    labels: &ComponentLabels,
    start_x: i64,
    start_y: i64,
    _width: i64,
    _height: i64,
) -> Vec<Point> {
    let target = labels.get(start_x, start_y);

    // A single isolated pixel has no nontrivial boundary; emit it alone.
    let mut boundary = vec![(start_x, start_y)];
    let mut current = (start_x, start_y);
    // We arrived at `start` conceptually from the west (its left neighbor
    // is guaranteed background, since scan order picks the leftmost pixel
    // of the blob's topmost row), so the search begins at the offset just
    // past west in clockwise order.
    let mut backtrack_dir = 6usize; // index of (-1, 0) in CLOCKWISE_OFFSETS

    loop {
        let mut found = None;
        for step in 1..=8 {
            let dir = (backtrack_dir + step) % 8;
            let (dx, dy) = CLOCKWISE_OFFSETS[dir];
            let (nx, ny) = (current.0 + dx, current.1 + dy);
            if labels.get(nx, ny) == target {
                found = Some((nx, ny, dir));
                break;
            }
        }

        let (nx, ny, dir) = match found {
            Some(v) => v,
            None => break, // isolated pixel
        };

        if (nx, ny) == (start_x, start_y) {
            break;
        }

        boundary.push((nx, ny));
        // Next search starts from the direction opposite the one we just
        // arrived from.
        backtrack_dir = (dir + 4) % 8;
        current = (nx, ny);

        if boundary.len() > 4 * (labels.width as usize + labels.height as usize) + 16 {
            // Pathological safety valve; should not trigger for any
            // well-formed mask.
            break;
        }
    }

    boundary
        .into_iter()
        .map(|(x, y)| Point::new(x as f64, y as f64))
        .collect()
}

/// `CHAIN_APPROX_SIMPLE`-style compression: drop every point that lies on
/// the straight run between its neighbors, keeping only direction-change
/// vertices. The sequence is treated as cyclic (the boundary loops back to
/// its start).
fn compress_collinear(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let dir = |a: Point, b: Point| -> (i32, i32) {
        (
            (b.x - a.x).signum() as i32,
            (b.y - a.y).signum() as i32,
        )
    };

    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        if dir(prev, cur) != dir(cur, next) {
            result.push(cur);
        }
    }

    if result.is_empty() {
        // Perfectly straight cyclic run (shouldn't happen for a closed
        // boundary); fall back to the raw points.
        return points.to_vec();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask() -> Mask {
        let mut mask = Mask::new(10, 10);
        for y in 2..6 {
            for x in 2..6 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[test]
    fn traces_single_square_blob() {
        let mask = square_mask();
        let contours = trace_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].len() >= 4);
        for p in &contours[0] {
            assert!(p.x >= 1.0 && p.x <= 6.0 && p.y >= 1.0 && p.y <= 6.0);
        }
    }

    #[test]
    fn traces_two_disjoint_blobs_in_scan_order() {
        let mut mask = Mask::new(20, 20);
        for y in 2..5 {
            for x in 2..5 {
                mask.set(x, y, true);
            }
        }
        for y in 10..13 {
            for x in 10..13 {
                mask.set(x, y, true);
            }
        }
        let contours = trace_external_contours(&mask);
        assert_eq!(contours.len(), 2);
        // first discovered blob is the top-left one
        assert!(contours[0].iter().all(|p| p.x < 6.0 && p.y < 6.0));
        assert!(contours[1].iter().all(|p| p.x >= 9.0 && p.y >= 9.0));
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = Mask::new(5, 5);
        assert!(trace_external_contours(&mask).is_empty());
    }
}
