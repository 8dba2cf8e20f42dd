//! Path optimizer: pen-travel minimization via merge, 2-opt, and greedy
//! adjacent swap passes (spec.md §4.8).

use crate::config::{MAX_2OPT_ITERATIONS, MERGE_THRESHOLD};
use crate::geometry::{distance, Point, Polyline};

#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub paths: Vec<Polyline>,
    pub total_distance: f64,
    pub improvement: f64,
}

/// Optimize pen-travel order of `paths`. Merge and 2-opt are individually
/// switchable; greedy adjacent swap always runs last.
pub fn optimize(paths: Vec<Polyline>, enable_merging: bool, enable_2opt: bool) -> OptimizeResult {
    if paths.is_empty() {
        return OptimizeResult {
            paths: Vec::new(),
            total_distance: 0.0,
            improvement: 0.0,
        };
    }

    let original_distance = total_travel(&paths);
    log::debug!("path_optimizer: starting travel={original_distance:.2} over {} paths", paths.len());

    let mut working = paths;
    if enable_merging {
        working = merge_paths(working, MERGE_THRESHOLD);
        log::debug!("path_optimizer: after merge, {} paths remain", working.len());
    }
    if enable_2opt {
        working = two_opt(working, MAX_2OPT_ITERATIONS);
        log::debug!("path_optimizer: after 2-opt, travel={:.2}", total_travel(&working));
    }
    working = greedy_adjacent_swap(working);

    let final_distance = total_travel(&working);
    let improvement = if original_distance > 0.0 {
        ((original_distance - final_distance) / original_distance * 100.0).max(0.0)
    } else {
        0.0
    };

    log::debug!("path_optimizer: final travel={final_distance:.2} improvement={improvement:.1}%");

    OptimizeResult {
        paths: working,
        total_distance: final_distance,
        improvement,
    }
}

fn total_travel(paths: &[Polyline]) -> f64 {
    paths
        .windows(2)
        .map(|w| distance(*w[0].last().unwrap(), w[1][0]))
        .sum()
}

/// Coalesce pairs of paths whose nearest endpoints are within `threshold`.
/// For each unused path, repeatedly scans for the first feasible unused
/// partner (index order), splices with whichever reversal the best
/// endpoint pairing requires, and restarts the inner scan — an O(n^3)
/// worst case preserved intentionally (spec.md §9 open question).
fn merge_paths(paths: Vec<Polyline>, threshold: f64) -> Vec<Polyline> {
    let n = paths.len();
    let mut used = vec![false; n];
    let mut result = Vec::new();

    for i in 0..n {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut current = paths[i].clone();

        loop {
            let mut found: Option<(usize, usize)> = None;

            for j in 0..n {
                if used[j] {
                    continue;
                }
                let start_i = *current.first().unwrap();
                let end_i = *current.last().unwrap();
                let start_j = *paths[j].first().unwrap();
                let end_j = *paths[j].last().unwrap();

                let pairings = [
                    distance(end_i, start_j),
                    distance(end_i, end_j),
                    distance(start_i, start_j),
                    distance(start_i, end_j),
                ];
                let (best_idx, &best_dist) = pairings
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                    .unwrap();

                if best_dist <= threshold {
                    found = Some((j, best_idx));
                    break;
                }
            }

            match found {
                Some((j, pairing)) => {
                    let mut other = paths[j].clone();
                    match pairing {
                        0 => current.extend(other),
                        1 => {
                            other.reverse();
                            current.extend(other);
                        }
                        2 => {
                            other.reverse();
                            other.extend(current);
                            current = other;
                        }
                        3 => {
                            other.extend(current);
                            current = other;
                        }
                        _ => unreachable!(),
                    }
                    used[j] = true;
                }
                None => break,
            }
        }

        result.push(current);
    }

    result
}

/// Reorders (never reverses the internal direction of) paths by trying
/// segment reversals of the travel order, accepting any strict
/// improvement, first-improving in lexicographic `(i, j)` order.
fn two_opt(paths: Vec<Polyline>, max_iterations: usize) -> Vec<Polyline> {
    let n = paths.len();
    if n < 4 {
        return paths;
    }

    let mut order: Vec<usize> = (0..n).collect();
    let travel = |order: &[usize]| -> f64 {
        order
            .windows(2)
            .map(|w| distance(*paths[w[0]].last().unwrap(), paths[w[1]][0]))
            .sum()
    };

    let mut iterations = 0;
    'passes: loop {
        for i in 1..n {
            for j in (i + 2)..=(n - 1) {
                if iterations >= max_iterations {
                    break 'passes;
                }
                let mut candidate = order.clone();
                candidate[i..j].reverse();
                if travel(&candidate) < travel(&order) - 1e-9 {
                    order = candidate;
                    iterations += 1;
                    continue 'passes;
                }
            }
        }
        break;
    }

    order.into_iter().map(|idx| paths[idx].clone()).collect()
}

fn greedy_adjacent_swap(mut paths: Vec<Polyline>) -> Vec<Polyline> {
    let n = paths.len();
    if n < 3 {
        return paths;
    }

    loop {
        let mut improved = false;
        for i in 0..n - 1 {
            let prev_end = if i == 0 { None } else { Some(*paths[i - 1].last().unwrap()) };
            let next_start = paths.get(i + 2).map(|p| p[0]);

            let current_cost = local_cost(prev_end, &paths[i], &paths[i + 1], next_start);
            let swapped_cost = local_cost(prev_end, &paths[i + 1], &paths[i], next_start);

            if swapped_cost < current_cost - 1e-9 {
                paths.swap(i, i + 1);
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }

    paths
}

fn local_cost(prev_end: Option<Point>, a: &Polyline, b: &Polyline, next_start: Option<Point>) -> f64 {
    let mut cost = 0.0;
    if let Some(p) = prev_end {
        cost += distance(p, a[0]);
    }
    cost += distance(*a.last().unwrap(), b[0]);
    if let Some(n) = next_start {
        cost += distance(*b.last().unwrap(), n);
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_empty_input() {
        // S1 from spec.md
        let result = optimize(Vec::new(), true, true);
        assert!(result.paths.is_empty());
        assert_eq!(result.total_distance, 0.0);
        assert_eq!(result.improvement, 0.0);
    }

    #[test]
    fn two_point_merge() {
        // S2 from spec.md
        let paths = vec![
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            vec![Point::new(11.0, 0.0), Point::new(20.0, 0.0)],
        ];
        let result = optimize(paths, true, false);
        assert_eq!(result.paths.len(), 1);
        assert_eq!(
            result.paths[0],
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(11.0, 0.0),
                Point::new(20.0, 0.0),
            ]
        );
    }

    #[test]
    fn two_opt_swaps_to_reduce_travel() {
        // S3 from spec.md
        let paths = vec![
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            vec![Point::new(100.0, 0.0), Point::new(110.0, 0.0)],
            vec![Point::new(10.0, 1.0), Point::new(20.0, 1.0)],
            vec![Point::new(110.0, 1.0), Point::new(120.0, 1.0)],
        ];
        let before = total_travel(&paths);
        let result = optimize(paths, false, true);
        assert!(result.total_distance < before);
    }

    #[test]
    fn optimization_never_increases_travel() {
        // invariant 1 from spec.md §8
        let paths = vec![
            vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)],
            vec![Point::new(50.0, 0.0), Point::new(55.0, 0.0)],
            vec![Point::new(5.1, 1.0), Point::new(10.0, 1.0)],
        ];
        let before = total_travel(&paths);
        let result = optimize(paths, true, true);
        assert!(result.total_distance <= before + 1e-9);
    }

    #[test]
    fn optimize_is_idempotent_up_to_travel_distance() {
        let paths = vec![
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            vec![Point::new(100.0, 0.0), Point::new(110.0, 0.0)],
            vec![Point::new(10.0, 1.0), Point::new(20.0, 1.0)],
        ];
        let once = optimize(paths, true, true);
        let twice = optimize(once.paths.clone(), true, true);
        assert!((once.total_distance - twice.total_distance).abs() < 1e-6);
    }
}
