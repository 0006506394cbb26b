//! Configuration for k-means partitioning.

use crate::config::constants::kmeans;
use crate::config::ClusteringConfig;
use crate::error::{TribeError, TribeResult};

/// K-means loop settings.
///
/// # Validation
///
/// All parameters are validated at construction time.
#[derive(Clone, Debug)]
pub struct KMeansConfig {
    /// Maximum Lloyd iterations. Must be > 0.
    pub max_iterations: usize,

    /// Iteration stops when no centroid moves further than this.
    /// Must be finite and > 0.0.
    pub convergence_threshold: f64,

    /// Seed for k-means++ sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl KMeansConfig {
    /// Create a new configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns `TribeError::Config` if any parameter is invalid.
    pub fn new(
        max_iterations: usize,
        convergence_threshold: f64,
        seed: Option<u64>,
    ) -> TribeResult<Self> {
        if max_iterations == 0 {
            return Err(TribeError::config("max_iterations must be > 0"));
        }
        if !convergence_threshold.is_finite() || convergence_threshold <= 0.0 {
            return Err(TribeError::config(
                "convergence_threshold must be a finite positive number",
            ));
        }

        Ok(Self {
            max_iterations,
            convergence_threshold,
            seed,
        })
    }

    /// Derive the k-means settings from the job's clustering section.
    pub fn from_clustering(config: &ClusteringConfig) -> TribeResult<Self> {
        Self::new(
            config.max_iterations,
            config.convergence_threshold,
            config.seed,
        )
    }
}

impl Default for KMeansConfig {
    /// max_iterations=100, convergence_threshold=1e-6, seed=42.
    fn default() -> Self {
        Self {
            max_iterations: kmeans::MAX_ITERATIONS,
            convergence_threshold: kmeans::CONVERGENCE_THRESHOLD,
            seed: Some(kmeans::DEFAULT_SEED),
        }
    }
}
