//! Snapshot of the voting data a job run clusters on.

use async_trait::async_trait;

use crate::error::TribeResult;
use crate::types::VoterSnapshot;

/// Supplies every user with every vote they have cast.
///
/// The job fetches the snapshot exactly once and reuses it for every scope,
/// so scopes within one run see consistent data. Implementations that page
/// through a large backend still return the assembled snapshot.
#[async_trait]
pub trait VoteSource: Send + Sync {
    /// Fetch all users, their observer flag and their votes joined with the
    /// tags of each voted post.
    ///
    /// # Errors
    /// - `TribeError::Source` - The backend could not produce the snapshot
    async fn snapshot(&self) -> TribeResult<Vec<VoterSnapshot>>;
}
