//! K-means partitioner.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{TribeError, TribeResult};

use super::algorithms::{
    compute_centroids, compute_wcss, count_distinct, effective_k, kmeans_plus_plus_init,
    nearest_centroid,
};
use super::config::KMeansConfig;
use super::metrics::euclidean_distance;
use super::types::PartitionResult;

/// Assigns latent vectors to clusters.
///
/// Implementors return numeric assignments only; labeling is the caller's
/// concern.
pub trait Partitioner: Send + Sync {
    /// Partition `points` into at most `requested_k` clusters.
    ///
    /// # Errors
    ///
    /// Returns `TribeError::Partition` if:
    /// - points is empty, ragged, or contains non-finite coordinates
    /// - fewer than 2 distinct points
    /// - requested_k is 0
    ///
    /// # Fail-Fast
    ///
    /// Invalid inputs cause immediate errors. No fallbacks.
    fn partition(&self, points: &[Vec<f64>], requested_k: usize) -> TribeResult<PartitionResult>;
}

impl<P: Partitioner + ?Sized> Partitioner for &P {
    fn partition(&self, points: &[Vec<f64>], requested_k: usize) -> TribeResult<PartitionResult> {
        (**self).partition(points, requested_k)
    }
}

/// Lloyd's algorithm with k-means++ seeding.
#[derive(Clone, Debug, Default)]
pub struct KMeansPartitioner {
    config: KMeansConfig,
}

impl KMeansPartitioner {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Partitioner for KMeansPartitioner {
    fn partition(&self, points: &[Vec<f64>], requested_k: usize) -> TribeResult<PartitionResult> {
        // FAIL FAST: Validate inputs
        if points.is_empty() {
            return Err(TribeError::partition("points must not be empty"));
        }
        if requested_k == 0 {
            return Err(TribeError::partition("requested k must be > 0"));
        }
        let dims = points[0].len();
        if dims == 0 || points.iter().any(|p| p.len() != dims) {
            return Err(TribeError::partition(
                "points must share one non-zero dimensionality",
            ));
        }
        if points.iter().flatten().any(|x| !x.is_finite()) {
            return Err(TribeError::partition("points contain non-finite coordinates"));
        }
        let distinct = count_distinct(points);
        if distinct < 2 {
            return Err(TribeError::partition(format!(
                "need at least 2 distinct points, got {}",
                distinct
            )));
        }

        let k = effective_k(requested_k, points.len(), distinct);
        debug!(
            k,
            requested_k,
            n = points.len(),
            distinct,
            max_iter = self.config.max_iterations,
            "Starting k-means"
        );

        let mut rng = self.rng();
        let mut centroids = kmeans_plus_plus_init(points, k, &mut rng);
        if centroids.len() != k {
            return Err(TribeError::partition(format!(
                "k-means++ seeded {} of {} centroids",
                centroids.len(),
                k
            )));
        }

        let mut assignments = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.config.max_iterations {
            iterations = iter + 1;

            // Assignment step
            for (slot, point) in assignments.iter_mut().zip(points.iter()) {
                *slot = nearest_centroid(point, &centroids);
            }

            // Update step
            let new_centroids = compute_centroids(points, &assignments, &centroids);

            let max_movement = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(old, new)| euclidean_distance(old, new))
                .fold(0.0f64, f64::max);

            centroids = new_centroids;

            if max_movement < self.config.convergence_threshold {
                converged = true;
                break;
            }
        }

        let wcss = compute_wcss(points, &assignments, &centroids);

        debug!(k, iterations, converged, wcss, "K-means finished");

        Ok(PartitionResult {
            assignments: assignments.iter().map(|&c| c as u32 + 1).collect(),
            centroids,
            k_effective: k,
            iterations,
            converged,
            wcss,
        })
    }
}
