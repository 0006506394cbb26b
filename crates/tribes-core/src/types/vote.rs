//! Votes, posts and the per-user snapshot rows the job clusters on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TribeError, TribeResult};

use super::ids::{PostId, UserId};

/// Signed vote value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Matrix cell value: +1.0 or -1.0.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = TribeError;

    fn try_from(value: i8) -> TribeResult<Self> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(TribeError::config(format!(
                "vote value must be +1 or -1, got {}",
                other
            ))),
        }
    }
}

/// A vote as stored by the application layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: UserId,
    pub post_id: PostId,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(voter: UserId, post_id: PostId, value: VoteValue) -> Self {
        Self {
            voter,
            post_id,
            value,
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A post with its topic tag names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub tags: Vec<String>,
}

impl Post {
    pub fn new(id: PostId, tags: Vec<String>) -> Self {
        Self { id, tags }
    }

    /// Exact, case-sensitive tag match.
    pub fn has_tag(&self, topic: &str) -> bool {
        self.tags.iter().any(|t| t == topic)
    }
}

/// One vote inside a [`VoterSnapshot`], joined with the target post's tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastVote {
    pub post_id: PostId,
    pub value: VoteValue,
    pub topics: Vec<String>,
}

impl CastVote {
    pub fn new(post_id: PostId, value: VoteValue, topics: Vec<String>) -> Self {
        Self {
            post_id,
            value,
            topics,
        }
    }

    #[inline]
    pub fn is_tagged(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

/// Every vote a single user has cast, as fetched once at job start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoterSnapshot {
    pub user_id: UserId,
    /// Observer accounts are never clustered.
    pub observer: bool,
    pub votes: Vec<CastVote>,
}

impl VoterSnapshot {
    pub fn new(user_id: UserId, votes: Vec<CastVote>) -> Self {
        Self {
            user_id,
            observer: false,
            votes,
        }
    }

    pub fn observer(user_id: UserId, votes: Vec<CastVote>) -> Self {
        Self {
            user_id,
            observer: true,
            votes,
        }
    }

    /// Copy of this row restricted to votes on posts tagged `topic`.
    pub fn restricted_to(&self, topic: &str) -> Self {
        Self {
            user_id: self.user_id.clone(),
            observer: self.observer,
            votes: self
                .votes
                .iter()
                .filter(|v| v.is_tagged(topic))
                .cloned()
                .collect(),
        }
    }

    #[inline]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
}
