//! tribes-core trait implementations.
//!
//! RocksDB calls are synchronous; the async methods run them inline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tribes_core::error::{TribeError, TribeResult};
use tribes_core::traits::{ActivityCounter, ClusterStore, VoteSource};
use tribes_core::types::{TopicClusters, UserId, UserRecord, VoterSnapshot};

use super::RocksDbTribeStore;

#[async_trait]
impl VoteSource for RocksDbTribeStore {
    async fn snapshot(&self) -> TribeResult<Vec<VoterSnapshot>> {
        self.snapshot_sync()
            .map_err(|e| TribeError::Source(e.to_string()))
    }
}

#[async_trait]
impl ActivityCounter for RocksDbTribeStore {
    async fn count_votes_since(&self, since: DateTime<Utc>) -> TribeResult<u64> {
        self.count_votes_since_sync(since)
            .map_err(|e| TribeError::Gate(e.to_string()))
    }
}

#[async_trait]
impl ClusterStore for RocksDbTribeStore {
    async fn set_global(&self, user_id: &UserId, cluster_id: u32, label: &str) -> TribeResult<()> {
        self.set_global_sync(user_id, cluster_id, label)
            .map_err(|e| TribeError::persistence(user_id.clone(), e.to_string()))
    }

    async fn merge_topic(
        &self,
        user_id: &UserId,
        topic: &str,
        cluster_id: u32,
    ) -> TribeResult<()> {
        self.merge_topic_sync(user_id, topic, cluster_id)
            .map_err(|e| TribeError::persistence(user_id.clone(), e.to_string()))
    }

    async fn topic_clusters(&self, user_id: &UserId) -> TribeResult<TopicClusters> {
        match self.get_profile(user_id)? {
            Some(_) => Ok(self.get_topic_clusters(user_id)?),
            None => Err(TribeError::persistence(user_id.clone(), "unknown user")),
        }
    }

    async fn get_user(&self, user_id: &UserId) -> TribeResult<Option<UserRecord>> {
        Ok(self.get_user_record(user_id)?)
    }
}
