//! Scope pass outcomes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::types::{ClusterAssignment, Scope, UserId};

use super::state::ScopeState;

/// Why a scope did not have enough data to cluster. Not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer users than required voted on the topic at all.
    TooFewTopicUsers { found: usize, required: usize },

    /// Fewer users than required cleared the minimum-votes threshold.
    TooFewActiveUsers { found: usize, required: usize },

    /// The active users' vote patterns are (almost) all identical.
    IndistinctBehavior { distinct: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTopicUsers { found, required } => {
                write!(f, "{} users voted in topic, need {}", found, required)
            }
            Self::TooFewActiveUsers { found, required } => {
                write!(f, "{} active users, need {}", found, required)
            }
            Self::IndistinctBehavior { distinct } => {
                write!(f, "only {} distinct vote pattern(s)", distinct)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScopeOutcome {
    Completed {
        /// Users that received an assignment
        clustered: usize,
        k_effective: usize,
        /// Members per cluster id, index 0 is id 1
        cluster_sizes: Vec<usize>,
        persisted: usize,
        failed_writes: usize,
    },
    Skipped(SkipReason),
    Failed { error: String },
}

/// Summary of one scope pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeReport {
    pub scope: Scope,
    pub final_state: ScopeState,
    pub outcome: ScopeOutcome,
    pub elapsed: Duration,

    /// Assignments produced by a completed pass, in matrix row order.
    #[serde(skip)]
    pub assignments: Vec<ClusterAssignment>,
}

impl ScopeReport {
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, ScopeOutcome::Completed { .. })
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, ScopeOutcome::Skipped(_))
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ScopeOutcome::Failed { .. })
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.outcome {
            ScopeOutcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Cluster id assigned to `user_id` in this pass.
    pub fn cluster_of(&self, user_id: &UserId) -> Option<u32> {
        self.assignments
            .iter()
            .find(|a| &a.user_id == user_id)
            .map(|a| a.cluster_id)
    }
}
