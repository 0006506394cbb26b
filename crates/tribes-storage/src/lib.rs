//! Tribes Storage Library
//!
//! RocksDB persistence for the tribes clustering job: users, posts and votes
//! as read by the job, and the global and per-topic cluster assignments it
//! writes back.
//!
//! [`RocksDbTribeStore`] implements the `VoteSource`, `ActivityCounter` and
//! `ClusterStore` traits from `tribes-core`.
//!
//! # Column Families
//!
//! See [`column_families`] for the 6 CFs and their key layouts.

mod codec;
pub mod column_families;
mod config;
pub mod error;
mod merge;
mod rocksdb_store;
pub mod schema;
mod types;

pub use codec::STORAGE_VERSION;
pub use config::TribeStoreConfig;
pub use error::{StorageError, StorageResult};
pub use rocksdb_store::RocksDbTribeStore;
pub use types::{GlobalAssignment, StoredVote, UserProfile, VoteOutcome};
