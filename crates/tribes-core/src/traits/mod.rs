//! Core trait definitions for the clustering job.
//!
//! These traits are the contract between the job and whatever holds the
//! application's data.
//!
//! # Traits
//!
//! - [`VoteSource`]: one-shot snapshot of every user's votes
//! - [`ActivityCounter`]: recent vote volume for the activity gate
//! - [`ClusterStore`]: persistence of per-scope cluster assignments

mod activity_counter;
mod cluster_store;
mod vote_source;

pub use activity_counter::ActivityCounter;
pub use cluster_store::ClusterStore;
pub use vote_source::VoteSource;
