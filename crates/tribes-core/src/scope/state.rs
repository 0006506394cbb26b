//! Scope pass states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a scope pass currently is.
///
/// ```text
/// Idle -> Gathering -> Filtering -> MatrixBuilding -> Projecting
///      -> Partitioning -> Persisting -> Done
///
/// Filtering                                 -> Skipped
/// MatrixBuilding | Projecting | Partitioning -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeState {
    Idle,
    Gathering,
    Filtering,
    MatrixBuilding,
    Projecting,
    Partitioning,
    Persisting,
    Done,
    Skipped,
    Failed,
}

impl ScopeState {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Gathering => "GATHERING",
            Self::Filtering => "FILTERING",
            Self::MatrixBuilding => "MATRIX_BUILDING",
            Self::Projecting => "PROJECTING",
            Self::Partitioning => "PARTITIONING",
            Self::Persisting => "PERSISTING",
            Self::Done => "DONE",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: ScopeState) -> bool {
        use ScopeState::*;
        matches!(
            (self, next),
            (Idle, Gathering)
                | (Gathering, Filtering)
                | (Filtering, MatrixBuilding)
                | (Filtering, Skipped)
                | (MatrixBuilding, Projecting)
                | (MatrixBuilding, Failed)
                | (Projecting, Partitioning)
                | (Projecting, Failed)
                | (Partitioning, Persisting)
                | (Partitioning, Failed)
                | (Persisting, Done)
        )
    }
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
