//! K-means partitioning of latent user vectors.
//!
//! # Overview
//!
//! Assigns every latent vector of a scope to one of `k_eff` clusters and
//! reports 1-indexed cluster ids, so id 0 stays reserved for "unclustered".
//!
//! # Algorithm
//!
//! 1. Clamp k: `k_eff = min(requested, points - 1, distinct points)`, >= 1
//! 2. Seed centroids with k-means++ (D^2-weighted sampling, seeded RNG)
//! 3. Assign each vector to its nearest centroid (Euclidean distance)
//! 4. Recompute centroids as the mean of their members
//! 5. Repeat until centroids stop moving or max iterations
//!
//! # Fail-Fast Validation
//!
//! - points must not be empty and must share one dimensionality
//! - every coordinate must be finite
//! - at least 2 distinct points
//! - requested k must be > 0

mod algorithms;
mod config;
mod metrics;
mod partitioner;
#[cfg(test)]
mod tests;
mod types;

pub use algorithms::{count_distinct, effective_k};
pub use config::KMeansConfig;
pub use partitioner::{KMeansPartitioner, Partitioner};
pub use types::PartitionResult;
