//! Default values for the clustering job.
//!
//! Every configurable knob has its default here so tests and the
//! `Default` impls share one source.

/// Clustering thresholds and shape.
pub mod clustering {
    /// Minimum votes a user needs to be clustered in the global scope.
    pub const MIN_VOTES_GLOBAL: usize = 3;

    /// Minimum votes on a topic's posts for a user to be clustered in it.
    pub const MIN_VOTES_TOPIC: usize = 2;

    /// Scopes with fewer active users than this are skipped.
    pub const MIN_ACTIVE_USERS: usize = 5;

    /// Latent coordinates kept per user.
    pub const LATENT_DIMS: usize = 3;

    /// Requested number of clusters per scope (before clamping).
    pub const CLUSTER_COUNT: usize = 3;

    /// Topics clustered after the global pass, in order.
    pub const DEFAULT_TOPICS: &[&str] = &["Tech", "Startup", "Policy", "Science", "News"];
}

/// K-means loop limits.
pub mod kmeans {
    pub const MAX_ITERATIONS: usize = 100;

    /// Stop when no centroid moves further than this.
    pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;

    /// Seed for k-means++ sampling. Fixed so reruns on unchanged data match.
    pub const DEFAULT_SEED: u64 = 42;
}

/// Re-clustering gate.
pub mod gate {
    /// Votes required inside the trailing window before a run is worth it.
    pub const MIN_NEW_VOTES: u64 = 10;

    /// Trailing window length (one hour).
    pub const WINDOW_SECS: u64 = 3600;
}

/// Storage defaults.
pub mod storage {
    pub const DEFAULT_PATH: &str = "./data/tribes";
    pub const BLOCK_CACHE_MB: usize = 64;
}
