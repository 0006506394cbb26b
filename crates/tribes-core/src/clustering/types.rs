//! Partitioning results.

/// Output of one k-means run.
#[derive(Clone, Debug)]
pub struct PartitionResult {
    /// Cluster id per input point, in input order, each in `1..=k_effective`.
    pub assignments: Vec<u32>,

    /// Final centroid per cluster (index 0 is cluster id 1).
    pub centroids: Vec<Vec<f64>>,

    /// Number of clusters actually used after clamping.
    pub k_effective: usize,

    /// Lloyd iterations performed.
    pub iterations: usize,

    /// Whether centroid movement fell below the threshold.
    pub converged: bool,

    /// Within-cluster sum of squares.
    pub wcss: f64,
}

impl PartitionResult {
    /// Members per cluster, index 0 is cluster id 1.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k_effective];
        for &id in &self.assignments {
            sizes[(id - 1) as usize] += 1;
        }
        sizes
    }

    /// Number of points partitioned.
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
