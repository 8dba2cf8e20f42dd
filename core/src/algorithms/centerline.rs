//! Centerline extractor: row-wise black-run detection followed by
//! bidirectional segment stitching (spec.md §4.3).

use std::collections::VecDeque;

use crate::config::Options;
use crate::geometry::{Point, Polyline};
use crate::raster::Raster;

const MIN_PATH_LENGTH: usize = 3;

#[derive(Debug, Clone)]
struct Run {
    y: u32,
    x1: f64,
    x2: f64,
    mid_x: f64,
    used: bool,
}

/// Extract centerline polylines. Each input row-run participates in at most
/// one output path (spec.md §8 property 6).
pub fn extract(raster: &Raster, options: &Options) -> Vec<Polyline> {
    let threshold = options.threshold as f64;
    let proximity = options.proximity;
    let height = raster.height() as usize;

    log::debug!(
        "centerline: extracting with threshold={threshold} proximity={proximity} on {}x{}",
        raster.width(),
        raster.height()
    );

    let mut rows: Vec<Vec<Run>> = (0..height as u32)
        .map(|y| find_runs_in_row(raster, y, threshold))
        .collect();

    let mut paths = Vec::new();

    for y in 0..height {
        for i in 0..rows[y].len() {
            if rows[y][i].used {
                continue;
            }
            rows[y][i].used = true;
            let start = rows[y][i].clone();
            let mut deque: VecDeque<Run> = VecDeque::new();
            deque.push_back(start.clone());

            // Trace upward.
            let mut cursor = start.clone();
            let mut ry = y;
            while ry > 0 {
                ry -= 1;
                match best_candidate(&rows, ry, &cursor, proximity) {
                    Some(idx) => {
                        rows[ry][idx].used = true;
                        cursor = rows[ry][idx].clone();
                        deque.push_front(cursor.clone());
                    }
                    None => break,
                }
            }

            // Trace downward.
            let mut cursor = start;
            let mut ry = y;
            while ry + 1 < height {
                ry += 1;
                match best_candidate(&rows, ry, &cursor, proximity) {
                    Some(idx) => {
                        rows[ry][idx].used = true;
                        cursor = rows[ry][idx].clone();
                        deque.push_back(cursor.clone());
                    }
                    None => break,
                }
            }

            if deque.len() >= MIN_PATH_LENGTH {
                paths.push(deque.into_iter().map(|r| Point::new(r.mid_x, r.y as f64)).collect());
            }
        }
    }

    log::debug!("centerline: emitted {} paths", paths.len());
    paths
}

fn find_runs_in_row(raster: &Raster, y: u32, threshold: f64) -> Vec<Run> {
    let width = raster.width();
    let mut runs = Vec::new();
    let mut run_start: Option<u32> = None;

    for x in 0..width {
        let dark = raster.gray(x, y) < threshold;
        match (dark, run_start) {
            (true, None) => run_start = Some(x),
            (false, Some(start)) => {
                runs.push(make_run(y, start, x - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(make_run(y, start, width - 1));
    }
    runs
}

fn make_run(y: u32, x1: u32, x2: u32) -> Run {
    Run {
        y,
        x1: x1 as f64,
        x2: x2 as f64,
        mid_x: (x1 as f64 + x2 as f64) / 2.0,
        used: false,
    }
}

/// Horizontal gap between two x-ranges: zero if they overlap, otherwise the
/// distance between their nearest ends.
fn horizontal_gap(a: (f64, f64), b: (f64, f64)) -> f64 {
    if a.1 < b.0 {
        b.0 - a.1
    } else if b.1 < a.0 {
        a.0 - b.1
    } else {
        0.0
    }
}

fn best_candidate(rows: &[Vec<Run>], row_index: usize, reference: &Run, proximity: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, run) in rows[row_index].iter().enumerate() {
        if run.used {
            continue;
        }
        let gap = horizontal_gap((reference.x1, reference.x2), (run.x1, run.x2));
        if gap > 2.0 * proximity {
            continue;
        }
        let cost = (reference.mid_x - run.mid_x).abs() + 0.5 * gap;
        if best.map(|(_, best_cost)| cost < best_cost).unwrap_or(true) {
            best = Some((idx, cost));
        }
    }
    best.map(|(idx, _)| idx)
}
