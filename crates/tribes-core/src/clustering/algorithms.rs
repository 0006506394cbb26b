//! K-means++ initialization, centroid updates and helpers.

use std::collections::HashSet;

use rand::Rng;

use super::metrics::euclidean_distance_squared;

/// Clamp the requested cluster count for a scope.
///
/// Never exceeds `points - 1`, the request, or the number of distinct points,
/// and is at least 1.
pub fn effective_k(requested: usize, points: usize, distinct: usize) -> usize {
    requested
        .min(points.saturating_sub(1))
        .min(distinct)
        .max(1)
}

/// Number of distinct points (exact comparison, `-0.0 == 0.0`).
pub fn count_distinct(points: &[Vec<f64>]) -> usize {
    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(points.len());
    for point in points {
        // Adding 0.0 folds -0.0 into +0.0 before taking the bits.
        seen.insert(point.iter().map(|x| (x + 0.0).to_bits()).collect());
    }
    seen.len()
}

/// Initialize centroids using k-means++.
///
/// The first centroid is chosen uniformly; each further centroid is drawn
/// with probability proportional to its squared distance from the nearest
/// centroid chosen so far. Points already used as centroids have weight 0,
/// so with `k <= count_distinct(points)` every centroid is distinct.
pub fn kmeans_plus_plus_init<R: Rng + ?Sized>(
    points: &[Vec<f64>],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    if n == 0 || k == 0 {
        return centroids;
    }

    centroids.push(points[rng.gen_range(0..n)].clone());

    // Distance from each point to its nearest centroid
    let mut min_distances = vec![f64::MAX; n];

    while centroids.len() < k {
        let last = &centroids[centroids.len() - 1];
        for (i, point) in points.iter().enumerate() {
            let dist = euclidean_distance_squared(point, last);
            if dist < min_distances[i] {
                min_distances[i] = dist;
            }
        }

        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = min_distances.iter().rposition(|d| *d > 0.0);
            for (i, &d) in min_distances.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                if target < d {
                    chosen = Some(i);
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            None
        };

        match next {
            Some(i) => centroids.push(points[i].clone()),
            // Every point coincides with a centroid: nothing left to seed.
            None => break,
        }
    }

    centroids
}

/// Index of the nearest centroid (ties go to the lowest index).
pub fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance_squared(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}

/// Compute new centroids as mean of assigned points.
///
/// A cluster that lost all its members keeps its previous centroid.
pub fn compute_centroids(
    points: &[Vec<f64>],
    assignments: &[usize],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dims = previous.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0f64; dims]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (sum, x) in sums[cluster].iter_mut().zip(point.iter()) {
            *sum += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous.iter())
        .map(|((mut sum, count), prev)| {
            if count == 0 {
                return prev.clone();
            }
            for elem in sum.iter_mut() {
                *elem /= count as f64;
            }
            sum
        })
        .collect()
}

/// Compute within-cluster sum of squares.
pub fn compute_wcss(points: &[Vec<f64>], assignments: &[usize], centroids: &[Vec<f64>]) -> f64 {
    points
        .iter()
        .zip(assignments.iter())
        .map(|(point, &cluster)| euclidean_distance_squared(point, &centroids[cluster]))
        .sum()
}
