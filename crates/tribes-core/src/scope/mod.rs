//! One clustering pass over one scope.
//!
//! A [`ScopeRunner`] takes the job snapshot, narrows it to the scope, filters
//! out inactive users, projects the remaining vote matrix and partitions it,
//! then writes the assignments through a [`crate::traits::ClusterStore`].
//! Progress is tracked by an explicit [`ScopeState`] machine and summarized in
//! a [`ScopeReport`].

mod report;
mod runner;
mod state;

pub use report::{ScopeOutcome, ScopeReport, SkipReason};
pub use runner::ScopeRunner;
pub use state::ScopeState;
