//! Domain types for the clustering job.
//!
//! - [`UserId`], [`PostId`]: uuid-backed identities
//! - [`Vote`], [`VoteValue`], [`Post`]: read-only inputs
//! - [`VoterSnapshot`], [`CastVote`]: one user's row of the job snapshot
//! - [`UserRecord`], [`TopicClusters`]: cluster fields owned by the store
//! - [`Scope`], [`ClusterAssignment`]: per-pass clustering context and output

mod ids;
mod scope;
mod user;
mod vote;

pub use ids::{PostId, UserId};
pub use scope::{ClusterAssignment, Scope};
pub use user::{
    TopicClusters, UserRecord, OBSERVER_LABEL, UNASSIGNED_CLUSTER_ID, UNASSIGNED_LABEL,
};
pub use vote::{CastVote, Post, Vote, VoteValue, VoterSnapshot};
