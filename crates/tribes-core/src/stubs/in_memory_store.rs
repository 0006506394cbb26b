//! In-memory stub implementation of the core store traits.
//!
//! # ⚠️ TEST ONLY - DO NOT USE IN PRODUCTION ⚠️
//!
//! `InMemoryTribeStore` implements [`VoteSource`], [`ActivityCounter`] and
//! [`ClusterStore`] without persistence. Use `RocksDbTribeStore` from
//! `tribes-storage` for anything that must survive the process.
//!
//! # Design
//!
//! - Users and posts live in `DashMap`s; `merge_topic` mutates under the
//!   per-entry lock, so concurrent merges on one user never lose a key
//! - Votes live in an ordered `Vec` behind a `parking_lot::RwLock`
//! - Failures can be injected per user (writes) or per operation (snapshot,
//!   activity count) to exercise the job's error paths
//! - Write counters let tests assert that nothing was written

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::error::{TribeError, TribeResult};
use crate::traits::{ActivityCounter, ClusterStore, VoteSource};
use crate::types::{
    CastVote, Post, PostId, TopicClusters, UserId, UserRecord, Vote, VoterSnapshot,
};

/// In-memory implementation of the core store traits.
///
/// # Thread Safety
///
/// Thread-safe via `DashMap` and `parking_lot::RwLock`.
///
/// # Example
///
/// ```
/// use tribes_core::stubs::InMemoryTribeStore;
/// use tribes_core::types::{UserId, UserRecord};
///
/// // Only use in tests!
/// let store = InMemoryTribeStore::new();
/// store.add_user(UserRecord::new(UserId::new(), "alice"));
/// assert_eq!(store.user_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTribeStore {
    users: DashMap<UserId, UserRecord>,

    /// Insertion order of users, so snapshots are deterministic
    user_order: RwLock<Vec<UserId>>,

    posts: DashMap<PostId, Post>,

    /// One entry per (voter, post)
    votes: RwLock<Vec<Vote>>,

    failing_users: DashSet<UserId>,
    fail_snapshot: AtomicBool,
    fail_count: AtomicBool,

    global_writes: AtomicUsize,
    topic_writes: AtomicUsize,
}

impl InMemoryTribeStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        info!("Creating new InMemoryTribeStore (TEST ONLY - no persistence)");
        Self::default()
    }

    /// Insert or replace a user.
    pub fn add_user(&self, user: UserRecord) {
        if self.users.insert(user.id.clone(), user.clone()).is_none() {
            self.user_order.write().push(user.id);
        }
    }

    pub fn add_post(&self, post: Post) {
        self.posts.insert(post.id.clone(), post);
    }

    /// Record a vote, replacing any earlier vote by the same user on the same
    /// post.
    pub fn add_vote(&self, vote: Vote) {
        let mut votes = self.votes.write();
        match votes
            .iter_mut()
            .find(|v| v.voter == vote.voter && v.post_id == vote.post_id)
        {
            Some(existing) => *existing = vote,
            None => votes.push(vote),
        }
    }

    /// Make every write for `user_id` fail.
    pub fn fail_writes_for(&self, user_id: UserId) {
        self.failing_users.insert(user_id);
    }

    pub fn set_fail_snapshot(&self, fail: bool) {
        self.fail_snapshot.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.read().len()
    }

    /// Successful `set_global` calls so far.
    pub fn global_writes(&self) -> usize {
        self.global_writes.load(Ordering::SeqCst)
    }

    /// Successful `merge_topic` calls so far.
    pub fn topic_writes(&self) -> usize {
        self.topic_writes.load(Ordering::SeqCst)
    }

    /// Synchronous read of a user record.
    pub fn user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.get(user_id).map(|entry| entry.value().clone())
    }

    fn check_writable(&self, user_id: &UserId) -> TribeResult<()> {
        if self.failing_users.contains(user_id) {
            error!(user_id = %user_id, "Injected write failure");
            return Err(TribeError::persistence(
                user_id.clone(),
                "injected write failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl VoteSource for InMemoryTribeStore {
    async fn snapshot(&self) -> TribeResult<Vec<VoterSnapshot>> {
        if self.fail_snapshot.load(Ordering::SeqCst) {
            return Err(TribeError::Source("injected snapshot failure".into()));
        }

        let order = self.user_order.read();
        let votes = self.votes.read();

        let snapshot: Vec<VoterSnapshot> = order
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| (id, u.observer)))
            .map(|(id, observer)| {
                let cast = votes
                    .iter()
                    .filter(|v| &v.voter == id)
                    .map(|v| {
                        let topics = self
                            .posts
                            .get(&v.post_id)
                            .map(|p| p.tags.clone())
                            .unwrap_or_default();
                        CastVote::new(v.post_id.clone(), v.value, topics)
                    })
                    .collect();
                VoterSnapshot {
                    user_id: id.clone(),
                    observer,
                    votes: cast,
                }
            })
            .collect();

        debug!(users = snapshot.len(), votes = votes.len(), "In-memory snapshot");
        Ok(snapshot)
    }
}

#[async_trait]
impl ActivityCounter for InMemoryTribeStore {
    async fn count_votes_since(&self, since: DateTime<Utc>) -> TribeResult<u64> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(TribeError::Gate("injected count failure".into()));
        }
        let count = self
            .votes
            .read()
            .iter()
            .filter(|v| v.created_at >= since)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl ClusterStore for InMemoryTribeStore {
    async fn set_global(&self, user_id: &UserId, cluster_id: u32, label: &str) -> TribeResult<()> {
        self.check_writable(user_id)?;
        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| TribeError::persistence(user_id.clone(), "unknown user"))?;
        user.cluster_id = cluster_id;
        user.cluster_label = label.to_string();
        self.global_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn merge_topic(
        &self,
        user_id: &UserId,
        topic: &str,
        cluster_id: u32,
    ) -> TribeResult<()> {
        self.check_writable(user_id)?;
        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| TribeError::persistence(user_id.clone(), "unknown user"))?;
        user.topic_clusters.merge(topic, cluster_id);
        self.topic_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn topic_clusters(&self, user_id: &UserId) -> TribeResult<TopicClusters> {
        self.users
            .get(user_id)
            .map(|u| u.topic_clusters.clone())
            .ok_or_else(|| TribeError::persistence(user_id.clone(), "unknown user"))
    }

    async fn get_user(&self, user_id: &UserId) -> TribeResult<Option<UserRecord>> {
        Ok(self.user(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoteValue;
    use chrono::Duration;

    #[tokio::test]
    async fn test_merge_topic_keeps_other_keys() {
        let store = InMemoryTribeStore::new();
        let id = UserId::new();
        store.add_user(UserRecord::new(id.clone(), "alice"));

        store.merge_topic(&id, "Tech", 2).await.unwrap();
        store.merge_topic(&id, "Policy", 1).await.unwrap();

        let clusters = store.topic_clusters(&id).await.unwrap();
        assert_eq!(clusters.get("Tech"), Some(2));
        assert_eq!(clusters.get("Policy"), Some(1));
        assert_eq!(store.topic_writes(), 2);

        println!("[VERIFIED] In-memory merge_topic keeps earlier keys");
    }

    #[tokio::test]
    async fn test_set_global_unknown_user_fails() {
        let store = InMemoryTribeStore::new();
        let err = store.set_global(&UserId::new(), 1, "Global Tribe 1").await.unwrap_err();

        assert!(matches!(err, TribeError::Persistence { .. }));
        assert_eq!(store.global_writes(), 0);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = InMemoryTribeStore::new();
        let id = UserId::new();
        store.add_user(UserRecord::new(id.clone(), "bob"));
        store.fail_writes_for(id.clone());

        assert!(store.set_global(&id, 1, "Global Tribe 1").await.is_err());
        assert!(store.merge_topic(&id, "Tech", 1).await.is_err());
        assert_eq!(store.user(&id).unwrap().cluster_id, 0);

        println!("[VERIFIED] Injected failures leave the record untouched");
    }

    #[tokio::test]
    async fn test_snapshot_joins_tags_and_replaces_votes() {
        let store = InMemoryTribeStore::new();
        let id = UserId::new();
        let post = PostId::new();
        store.add_user(UserRecord::new(id.clone(), "carol"));
        store.add_post(Post::new(post.clone(), vec!["Tech".into()]));
        store.add_vote(Vote::new(id.clone(), post.clone(), VoteValue::Up));
        store.add_vote(Vote::new(id.clone(), post.clone(), VoteValue::Down));

        let snapshot = store.snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].votes.len(), 1);
        assert_eq!(snapshot[0].votes[0].value, VoteValue::Down);
        assert_eq!(snapshot[0].votes[0].topics, vec!["Tech".to_string()]);
    }

    #[tokio::test]
    async fn test_count_votes_since_window() {
        let store = InMemoryTribeStore::new();
        let id = UserId::new();
        let now = Utc::now();
        store.add_user(UserRecord::new(id.clone(), "dave"));
        store.add_vote(
            Vote::new(id.clone(), PostId::new(), VoteValue::Up)
                .with_created_at(now - Duration::hours(2)),
        );
        store.add_vote(
            Vote::new(id.clone(), PostId::new(), VoteValue::Up)
                .with_created_at(now - Duration::minutes(5)),
        );

        let count = store
            .count_votes_since(now - Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(count, 1);
    }
}
