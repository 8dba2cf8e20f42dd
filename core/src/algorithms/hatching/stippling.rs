//! Stippling: Bridson's Poisson-disk sampling rendered as short dot
//! strokes (spec.md §4.5 Stippling).

use std::f64::consts::{SQRT_2, TAU};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{Point, Polyline};
use crate::raster::Mask;

const K_ATTEMPTS: u32 = 30;

pub fn generate(
    mask: &Mask,
    width: u32,
    height: u32,
    base_spacing: f64,
    intensity: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<Polyline> {
    let min_dist = base_spacing * 0.5;
    let max_dist = base_spacing * 2.0;
    if min_dist <= 0.0 {
        return Vec::new();
    }

    let target_count = (width as f64 * height as f64 * (intensity * 0.3) / (min_dist * min_dist))
        .round()
        .max(0.0) as usize;

    let samples = poisson_disk_sample(width as f64, height as f64, min_dist, max_dist, K_ATTEMPTS, target_count, rng);

    samples
        .into_iter()
        .filter(|p| mask.sample(p.x, p.y))
        .map(|p| {
            let dx = rng.gen_range(0.5..1.5);
            vec![p, Point::new(p.x + dx, p.y)]
        })
        .collect()
}

/// Bridson's algorithm: grid-accelerated dart throwing with a minimum
/// inter-sample distance. Candidates are drawn in the annulus
/// `[min_dist, max_dist)` around an active sample; a cell holds at most one
/// point because `cell_size = min_dist / sqrt(2)`.
fn poisson_disk_sample(
    width: f64,
    height: f64,
    min_dist: f64,
    max_dist: f64,
    k: u32,
    target_count: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Point> {
    let cell_size = min_dist / SQRT_2;
    let grid_w = (width / cell_size).ceil().max(1.0) as usize;
    let grid_h = (height / cell_size).ceil().max(1.0) as usize;
    let mut grid: Vec<Option<usize>> = vec![None; grid_w * grid_h];

    let mut points: Vec<Point> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
    points.push(first);
    active.push(0);
    insert_grid(&mut grid, grid_w, cell_size, 0, first);

    while !active.is_empty() && points.len() < target_count.max(1) {
        let pick = rng.gen_range(0..active.len());
        let origin = points[active[pick]];
        let mut placed = false;

        for _ in 0..k {
            let angle = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(min_dist..max_dist);
            let candidate = Point::new(origin.x + radius * angle.cos(), origin.y + radius * angle.sin());
            if candidate.x < 0.0 || candidate.y < 0.0 || candidate.x >= width || candidate.y >= height {
                continue;
            }
            if far_enough(&grid, grid_w, grid_h, cell_size, &points, candidate, min_dist) {
                let new_idx = points.len();
                points.push(candidate);
                active.push(new_idx);
                insert_grid(&mut grid, grid_w, cell_size, new_idx, candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            active.remove(pick);
        }
    }

    points
}

fn insert_grid(grid: &mut [Option<usize>], grid_w: usize, cell_size: f64, idx: usize, p: Point) {
    let gx = (p.x / cell_size) as usize;
    let gy = (p.y / cell_size) as usize;
    grid[gy * grid_w + gx] = Some(idx);
}

fn far_enough(
    grid: &[Option<usize>],
    grid_w: usize,
    grid_h: usize,
    cell_size: f64,
    points: &[Point],
    candidate: Point,
    min_dist: f64,
) -> bool {
    let gx = (candidate.x / cell_size) as i64;
    let gy = (candidate.y / cell_size) as i64;
    for dy in -2..=2 {
        for dx in -2..=2 {
            let nx = gx + dx;
            let ny = gy + dy;
            if nx < 0 || ny < 0 || nx as usize >= grid_w || ny as usize >= grid_h {
                continue;
            }
            if let Some(idx) = grid[ny as usize * grid_w + nx as usize] {
                let other = points[idx];
                let dx2 = other.x - candidate.x;
                let dy2 = other.y - candidate.y;
                if (dx2 * dx2 + dy2 * dy2).sqrt() < min_dist {
                    return false;
                }
            }
        }
    }
    true
}
