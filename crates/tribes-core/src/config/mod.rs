//! Configuration management for the clustering job.
//!
//! Loaded in layers by [`Config::load`]:
//! 1. `config/default.toml`
//! 2. `config/{TRIBES_ENV}.toml`
//! 3. Environment variables with the `TRIBES__` prefix (e.g.
//!    `TRIBES__GATE__MIN_NEW_VOTES=25`)
//!
//! Every loader ends in [`Config::validate`]. An invalid configuration is a
//! fatal [`TribeError::Config`].

pub mod constants;


use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TribeError, TribeResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from files and environment.
    pub fn load() -> TribeResult<Self> {
        let env = std::env::var("TRIBES_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("TRIBES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> TribeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TribeError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| TribeError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> TribeResult<()> {
        self.clustering.validate()?;
        self.gate.validate()?;
        if self.storage.path.trim().is_empty() {
            return Err(TribeError::config("storage.path must not be empty"));
        }
        Ok(())
    }
}

/// Clustering thresholds and shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Topic scopes, clustered in this order after the global scope.
    pub topics: Vec<String>,
    pub min_votes_global: usize,
    pub min_votes_topic: usize,
    /// A scope with fewer users than this (after filtering) is skipped.
    pub min_active_users: usize,
    pub latent_dims: usize,
    /// Requested k; the partitioner clamps it per scope.
    pub cluster_count: usize,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    /// `None` seeds k-means++ from entropy.
    pub seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        use constants::{clustering, kmeans};
        Self {
            topics: clustering::DEFAULT_TOPICS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            min_votes_global: clustering::MIN_VOTES_GLOBAL,
            min_votes_topic: clustering::MIN_VOTES_TOPIC,
            min_active_users: clustering::MIN_ACTIVE_USERS,
            latent_dims: clustering::LATENT_DIMS,
            cluster_count: clustering::CLUSTER_COUNT,
            max_iterations: kmeans::MAX_ITERATIONS,
            convergence_threshold: kmeans::CONVERGENCE_THRESHOLD,
            seed: Some(kmeans::DEFAULT_SEED),
        }
    }
}

impl ClusteringConfig {
    /// Reject blank/duplicate topics and non-positive thresholds.
    ///
    /// An empty topic list is valid: only the global scope runs.
    pub fn validate(&self) -> TribeResult<()> {
        let mut seen = HashSet::with_capacity(self.topics.len());
        for topic in &self.topics {
            if topic.trim().is_empty() {
                return Err(TribeError::config("clustering.topics contains a blank name"));
            }
            if !seen.insert(topic.as_str()) {
                return Err(TribeError::config(format!(
                    "clustering.topics contains duplicate topic '{}'",
                    topic
                )));
            }
        }

        let positive = [
            ("clustering.min_votes_global", self.min_votes_global),
            ("clustering.min_votes_topic", self.min_votes_topic),
            ("clustering.min_active_users", self.min_active_users),
            ("clustering.latent_dims", self.latent_dims),
            ("clustering.cluster_count", self.cluster_count),
            ("clustering.max_iterations", self.max_iterations),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(TribeError::config(format!("{} must be > 0", name)));
            }
        }

        if !self.convergence_threshold.is_finite() || self.convergence_threshold <= 0.0 {
            return Err(TribeError::config(
                "clustering.convergence_threshold must be a finite positive number",
            ));
        }

        Ok(())
    }
}

/// Re-clustering gate settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    pub min_new_votes: u64,
    pub window_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_new_votes: constants::gate::MIN_NEW_VOTES,
            window_secs: constants::gate::WINDOW_SECS,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> TribeResult<()> {
        if self.min_new_votes == 0 {
            return Err(TribeError::config("gate.min_new_votes must be > 0"));
        }
        if self.window_secs == 0 {
            return Err(TribeError::config("gate.window_secs must be > 0"));
        }
        let window = i64::try_from(self.window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds);
        if window.is_none() {
            return Err(TribeError::config("gate.window_secs is out of range"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub block_cache_mb: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: constants::storage::DEFAULT_PATH.to_string(),
            block_cache_mb: constants::storage::BLOCK_CACHE_MB,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
