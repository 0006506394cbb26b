//! Shared fixtures for tribes-core integration tests (REAL data, NO mocks).

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use tribes_core::config::Config;
use tribes_core::stubs::InMemoryTribeStore;
use tribes_core::types::{Post, PostId, UserId, UserRecord, Vote, VoteValue};

/// A store plus handles to what was seeded into it.
pub struct World {
    pub store: InMemoryTribeStore,
    pub now: DateTime<Utc>,
}

impl World {
    pub fn new() -> Self {
        Self {
            store: InMemoryTribeStore::new(),
            now: Utc::now(),
        }
    }

    pub fn users(&self, count: usize, prefix: &str) -> Vec<UserId> {
        (0..count)
            .map(|i| {
                let id = UserId::new();
                self.store
                    .add_user(UserRecord::new(id.clone(), format!("{}-{}", prefix, i)));
                id
            })
            .collect()
    }

    pub fn observer(&self) -> UserId {
        let id = UserId::new();
        self.store.add_user(UserRecord::observer(id.clone(), "mirror-bot"));
        id
    }

    pub fn posts(&self, count: usize, tags: &[&str]) -> Vec<PostId> {
        (0..count)
            .map(|_| {
                let id = PostId::new();
                self.store.add_post(Post::new(
                    id.clone(),
                    tags.iter().map(|t| t.to_string()).collect(),
                ));
                id
            })
            .collect()
    }

    /// Every user votes `value` on every post, five minutes ago.
    pub fn block_vote(&self, users: &[UserId], posts: &[PostId], value: VoteValue) {
        self.block_vote_at(users, posts, value, self.now - Duration::minutes(5));
    }

    pub fn block_vote_at(
        &self,
        users: &[UserId],
        posts: &[PostId],
        value: VoteValue,
        at: DateTime<Utc>,
    ) {
        for user in users {
            for post in posts {
                self.store.add_vote(
                    Vote::new(user.clone(), post.clone(), value).with_created_at(at),
                );
            }
        }
    }

    pub fn vote(&self, user: &UserId, post: &PostId, value: VoteValue) {
        self.store.add_vote(
            Vote::new(user.clone(), post.clone(), value)
                .with_created_at(self.now - Duration::minutes(5)),
        );
    }
}

/// Default configuration restricted to the given topics.
pub fn config_with_topics(topics: &[&str]) -> Config {
    let mut config = Config::default();
    config.clustering.topics = topics.iter().map(|t| t.to_string()).collect();
    config
}

/// Whether two users received the same id in every scope assignment list.
pub fn same_cluster(assignments: &[(UserId, u32)], a: &UserId, b: &UserId) -> bool {
    let find = |u: &UserId| assignments.iter().find(|(id, _)| id == u).map(|(_, c)| *c);
    find(a).is_some() && find(a) == find(b)
}
