//! Clustering scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A clustering context: every vote, or only votes on one topic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Topic(String),
}

impl Scope {
    pub fn topic(name: impl Into<String>) -> Self {
        Self::Topic(name.into())
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    pub fn topic_name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Topic(name) => Some(name),
        }
    }

    /// Human label for a global cluster id. Topic scopes carry no label.
    pub fn label_for(&self, cluster_id: u32) -> Option<String> {
        match self {
            Self::Global => Some(format!("Global Tribe {}", cluster_id)),
            Self::Topic(_) => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Topic(name) => write!(f, "{}", name),
        }
    }
}

/// One user's cluster membership within a scope. `cluster_id` is >= 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub user_id: UserId,
    pub cluster_id: u32,
    pub label: Option<String>,
}
