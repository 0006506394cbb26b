//! User cluster fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Global cluster id meaning "never clustered" or "observer".
pub const UNASSIGNED_CLUSTER_ID: u32 = 0;

/// Label carried by users that have never been clustered.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Label carried by observer (bot/mirror) accounts.
pub const OBSERVER_LABEL: &str = "Observer";

/// Per-user mapping from topic name to that topic's cluster id.
///
/// An absent key means the user was never clustered for the topic, which is
/// distinct from any stored id. Stored ids are always >= 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicClusters(BTreeMap<String, u32>);

impl TopicClusters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set exactly one topic key, leaving the others untouched.
    pub fn merge(&mut self, topic: impl Into<String>, cluster_id: u32) {
        self.0.insert(topic.into(), cluster_id);
    }

    /// Apply every entry of `other` on top of `self`.
    pub fn merge_all(&mut self, other: TopicClusters) {
        self.0.extend(other.0);
    }

    pub fn get(&self, topic: &str) -> Option<u32> {
        self.0.get(topic).copied()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.0.contains_key(topic)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u32)> for TopicClusters {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The cluster-related view of a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub observer: bool,
    pub cluster_id: u32,
    pub cluster_label: String,
    pub topic_clusters: TopicClusters,
}

impl UserRecord {
    /// A fresh, never-clustered user.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            observer: false,
            cluster_id: UNASSIGNED_CLUSTER_ID,
            cluster_label: UNASSIGNED_LABEL.to_string(),
            topic_clusters: TopicClusters::new(),
        }
    }

    /// A bot or mirror account, pinned to cluster 0.
    pub fn observer(id: UserId, name: impl Into<String>) -> Self {
        Self {
            observer: true,
            cluster_label: OBSERVER_LABEL.to_string(),
            ..Self::new(id, name)
        }
    }

    #[inline]
    pub fn is_clustered(&self) -> bool {
        self.cluster_id != UNASSIGNED_CLUSTER_ID
    }
}
