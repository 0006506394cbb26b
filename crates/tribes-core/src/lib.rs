//! Tribes Core Library
//!
//! Behavioral cohort clustering for a link-aggregator's users. Votes are
//! turned into a user x post matrix, reduced to a few latent coordinates per
//! user by singular value decomposition, and partitioned with k-means into
//! "tribes", once over all votes and once per configured topic.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`UserRecord`, `Vote`, `VoterSnapshot`, `Scope`, ...)
//! - The pipeline stages (`matrix`, `projection`, `clustering`)
//! - The per-scope state machine (`scope`) and the batch job (`job`, `gate`)
//! - Storage traits (`VoteSource`, `ActivityCounter`, `ClusterStore`) and an
//!   in-memory stub
//! - Error types and configuration
//!
//! # Example
//!
//! ```
//! use tribes_core::clustering::{KMeansPartitioner, Partitioner};
//!
//! let points = vec![
//!     vec![0.0, 0.0, 0.0],
//!     vec![0.1, 0.0, 0.0],
//!     vec![5.0, 5.0, 0.0],
//!     vec![5.1, 5.0, 0.0],
//! ];
//! let result = KMeansPartitioner::default().partition(&points, 2).unwrap();
//! assert_eq!(result.k_effective, 2);
//! assert_eq!(result.assignments[0], result.assignments[1]);
//! ```

pub mod clustering;
pub mod config;
pub mod error;
pub mod gate;
pub mod job;
pub mod matrix;
pub mod projection;
pub mod scope;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{TribeError, TribeResult};
pub use gate::{ActivityGate, GateDecision};
pub use job::{ClusteringJob, JobReport};
pub use scope::{ScopeOutcome, ScopeReport, ScopeRunner, ScopeState, SkipReason};
