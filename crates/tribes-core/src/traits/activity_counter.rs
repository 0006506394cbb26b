use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TribeResult;

/// Counts votes cast recently.
#[async_trait]
pub trait ActivityCounter: Send + Sync {
    /// Number of votes with `created_at >= since`.
    ///
    /// # Errors
    /// - `TribeError::Gate` - The count could not be executed
    async fn count_votes_since(&self, since: DateTime<Utc>) -> TribeResult<u64>;
}
