//! Error types for tribes-core.
//!
//! A single [`TribeError`] covers every failure the clustering job can hit.
//! Variants are grouped by blast radius:
//!
//! - **Fatal** (`Config`, `Source`, `Gate`): the whole job stops.
//! - **Scope-local** (`EmptyMatrix`, `Projection`, `Partition`): one scope
//!   aborts, the remaining scopes still run.
//! - **Per-user** (`Persistence`, `Storage` during a write): counted in the
//!   scope report, the batch continues.
//!
//! A skipped scope is NOT an error. See [`crate::scope::SkipReason`].
//!
//! # Examples
//!
//! ```rust
//! use tribes_core::error::TribeError;
//!
//! let err = TribeError::Partition("fewer than 2 distinct points".into());
//! assert!(err.is_scope_local());
//! assert!(!err.is_fatal());
//! ```


use thiserror::Error;

use crate::types::UserId;

/// Top-level error type for the clustering job.
#[derive(Debug, Error)]
pub enum TribeError {
    /// Configuration is unusable.
    ///
    /// # When This Occurs
    ///
    /// - Blank or duplicate topic names
    /// - A zero threshold, dimension, cluster count or gate window
    /// - Configuration file missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vote matrix would have no rows or no columns.
    ///
    /// Callers pre-filter scopes, so reaching this means a filtering bug.
    #[error("Empty vote matrix: {rows} rows x {cols} columns")]
    EmptyMatrix {
        /// Number of active users handed to the builder
        rows: usize,
        /// Number of distinct posts referenced by their votes
        cols: usize,
    },

    /// Singular value decomposition could not complete.
    #[error("Projection error: {0}")]
    Projection(String),

    /// K-means partitioning could not complete.
    #[error("Partition error: {0}")]
    Partition(String),

    /// A single user's cluster assignment could not be written.
    #[error("Persistence error for user {user_id}: {message}")]
    Persistence {
        /// The user whose write failed
        user_id: UserId,
        /// Backend message
        message: String,
    },

    /// The vote snapshot could not be fetched.
    #[error("Vote source error: {0}")]
    Source(String),

    /// The recent-activity count could not be executed.
    #[error("Activity gate error: {0}")]
    Gate(String),

    /// Storage backend failure outside the categories above.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TribeError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a projection error.
    pub fn projection(message: impl Into<String>) -> Self {
        Self::Projection(message.into())
    }

    /// Create a partition error.
    pub fn partition(message: impl Into<String>) -> Self {
        Self::Partition(message.into())
    }

    /// Create a per-user persistence error.
    pub fn persistence(user_id: UserId, message: impl Into<String>) -> Self {
        Self::Persistence {
            user_id,
            message: message.into(),
        }
    }

    /// Whether this error stops the whole job.
    ///
    /// Fatal errors become the job's `Err` result and a non-zero CLI exit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Source(_) | Self::Gate(_))
    }

    /// Whether this error only aborts the scope it occurred in.
    pub fn is_scope_local(&self) -> bool {
        matches!(
            self,
            Self::EmptyMatrix { .. } | Self::Projection(_) | Self::Partition(_)
        )
    }
}

impl From<config::ConfigError> for TribeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used throughout tribes-core.
pub type TribeResult<T> = Result<T, TribeError>;
