//! Storage-local record types (not defined in tribes-core).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tribes_core::types::{UserId, UserRecord, VoteValue};

/// Identity part of a user, as written by the application layer.
///
/// Cluster fields live in their own CFs and are joined on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub observer: bool,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: UserId, name: impl Into<String>, observer: bool) -> Self {
        Self {
            id,
            name: name.into(),
            observer,
            created_at: Utc::now(),
        }
    }
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self::new(record.id.clone(), record.name.clone(), record.observer)
    }
}

/// Value of the votes CF. The (user, post) pair is the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVote {
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// Value of the global_clusters CF.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalAssignment {
    pub cluster_id: u32,
    pub label: String,
    pub assigned_at: DateTime<Utc>,
}

/// What [`record_vote`](crate::RocksDbTribeStore::record_vote) did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// No earlier vote: stored with the given timestamp.
    Created,
    /// Opposite earlier vote: value flipped, original timestamp kept.
    Updated,
    /// Same value cast again: the vote was withdrawn.
    Removed,
}
