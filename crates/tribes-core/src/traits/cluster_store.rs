//! Persistence of cluster assignments.

use async_trait::async_trait;

use crate::error::TribeResult;
use crate::types::{TopicClusters, UserId, UserRecord};

/// Writes cluster assignments back to user records.
///
/// # Implementation Notes
///
/// - Every write concerns exactly one user and reports its own outcome; the
///   caller decides whether a failure matters.
/// - `merge_topic` must be atomic per user: concurrent merges of different
///   topics for the same user must never lose each other's key.
/// - Implementations should log errors via `tracing` before returning.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Overwrite the user's global cluster id and label.
    ///
    /// # Errors
    /// - `TribeError::Persistence` - The user is unknown or the write failed
    async fn set_global(&self, user_id: &UserId, cluster_id: u32, label: &str) -> TribeResult<()>;

    /// Set `topic -> cluster_id` in the user's topic mapping, leaving every
    /// other key untouched.
    ///
    /// # Errors
    /// - `TribeError::Persistence` - The user is unknown or the write failed
    async fn merge_topic(&self, user_id: &UserId, topic: &str, cluster_id: u32)
        -> TribeResult<()>;

    /// Fresh read of the user's topic mapping.
    ///
    /// # Errors
    /// - `TribeError::Persistence` - The user is unknown
    /// - `TribeError::Storage` - Backend failure
    async fn topic_clusters(&self, user_id: &UserId) -> TribeResult<TopicClusters>;

    /// Full cluster view of the user, `None` if unknown.
    ///
    /// # Errors
    /// - `TribeError::Storage` - Backend failure
    async fn get_user(&self, user_id: &UserId) -> TribeResult<Option<UserRecord>>;
}
