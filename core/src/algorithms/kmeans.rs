//! K-means color quantization in RGB space.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// An RGB color center, kept in floating point during iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Center {
    fn sq_dist(&self, r: u8, g: u8, b: u8) -> f64 {
        let dr = self.r - r as f64;
        let dg = self.g - g as f64;
        let db = self.b - b as f64;
        dr * dr + dg * dg + db * db
    }
}

pub struct KMeansResult {
    pub centers: Vec<Center>,
    pub labels: Vec<u32>,
    pub inertia: f64,
}

/// Run k-means on `pixels` (flattened RGB triples) with `k` centers, up to
/// `max_iterations`, converging when total center movement drops below
/// `convergence_eps`. Performs `restarts` independent random-init runs and
/// keeps the one with lowest inertia.
///
/// Returns `None` if there are fewer distinct pixels than `k` (k-means
/// cannot meaningfully form that many clusters); callers fall back to
/// threshold-based extraction in that case, per spec.md §4.2.
pub fn kmeans_rgb(
    pixels: &[(u8, u8, u8)],
    k: u32,
    max_iterations: u32,
    convergence_eps: f64,
    restarts: u32,
    rng: &mut ChaCha8Rng,
) -> Option<KMeansResult> {
    let n = pixels.len();
    if n == 0 || (n as u32) < k {
        return None;
    }

    let mut best: Option<KMeansResult> = None;

    for _ in 0..restarts.max(1) {
        let mut centers: Vec<Center> = (0..k)
            .map(|_| {
                let idx = rng.gen_range(0..n);
                let (r, g, b) = pixels[idx];
                Center {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                }
            })
            .collect();

        let mut labels = vec![0u32; n];

        for _ in 0..max_iterations {
            // Assignment step.
            for (i, &(r, g, b)) in pixels.iter().enumerate() {
                let mut best_k = 0u32;
                let mut best_d = f64::INFINITY;
                for (ci, center) in centers.iter().enumerate() {
                    let d = center.sq_dist(r, g, b);
                    if d < best_d {
                        best_d = d;
                        best_k = ci as u32;
                    }
                }
                labels[i] = best_k;
            }

            // Update step.
            let mut sums = vec![(0f64, 0f64, 0f64, 0u32); k as usize];
            for (i, &(r, g, b)) in pixels.iter().enumerate() {
                let entry = &mut sums[labels[i] as usize];
                entry.0 += r as f64;
                entry.1 += g as f64;
                entry.2 += b as f64;
                entry.3 += 1;
            }

            let mut movement = 0.0;
            for (ci, (sr, sg, sb, count)) in sums.into_iter().enumerate() {
                if count == 0 {
                    continue; // keep empty centers where they are
                }
                let new_center = Center {
                    r: sr / count as f64,
                    g: sg / count as f64,
                    b: sb / count as f64,
                };
                let old = centers[ci];
                let dr = new_center.r - old.r;
                let dg = new_center.g - old.g;
                let db = new_center.b - old.b;
                movement += (dr * dr + dg * dg + db * db).sqrt();
                centers[ci] = new_center;
            }

            if movement < convergence_eps {
                break;
            }
        }

        let inertia: f64 = pixels
            .iter()
            .zip(labels.iter())
            .map(|(&(r, g, b), &label)| centers[label as usize].sq_dist(r, g, b))
            .sum();

        let candidate = KMeansResult {
            centers,
            labels,
            inertia,
        };
        if best.as_ref().map(|b| candidate.inertia < b.inertia).unwrap_or(true) {
            best = Some(candidate);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn separates_two_obvious_clusters() {
        let mut pixels = Vec::new();
        for _ in 0..20 {
            pixels.push((10u8, 10u8, 10u8));
        }
        for _ in 0..20 {
            pixels.push((240u8, 240u8, 240u8));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = kmeans_rgb(&pixels, 2, 20, 1.0, 5, &mut rng).unwrap();
        let label_dark = result.labels[0];
        let label_light = result.labels[20];
        assert_ne!(label_dark, label_light);
        for &label in &result.labels[0..20] {
            assert_eq!(label, label_dark);
        }
        for &label in &result.labels[20..40] {
            assert_eq!(label, label_light);
        }
    }

    #[test]
    fn returns_none_for_too_few_pixels() {
        let pixels = vec![(1u8, 1u8, 1u8), (2u8, 2u8, 2u8)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(kmeans_rgb(&pixels, 5, 20, 1.0, 3, &mut rng).is_none());
    }

    #[test]
    fn is_deterministic_for_a_fixed_seed() {
        let mut pixels = Vec::new();
        for i in 0..50u32 {
            pixels.push(((i % 256) as u8, ((i * 3) % 256) as u8, ((i * 7) % 256) as u8));
        }
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        let r1 = kmeans_rgb(&pixels, 4, 20, 1.0, 10, &mut rng1).unwrap();
        let r2 = kmeans_rgb(&pixels, 4, 20, 1.0, 10, &mut rng2).unwrap();
        assert_eq!(r1.labels, r2.labels);
    }
}
