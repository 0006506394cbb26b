//! Posts, vote ingestion, snapshots and activity counts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rocksdb::{Direction, IteratorMode, WriteBatch};
use tracing::{debug, warn};

use tribes_core::types::{CastVote, Post, PostId, UserId, VoteValue, VoterSnapshot};

use crate::codec::{deserialize_with_version, serialize_with_version};
use crate::column_families::{CF_POSTS, CF_VOTES, CF_VOTE_TIMES};
use crate::error::{StorageError, StorageResult};
use crate::schema::{parse_vote_key, post_key, vote_key, vote_time_key, vote_time_prefix};
use crate::types::{StoredVote, VoteOutcome};

use super::RocksDbTribeStore;

impl RocksDbTribeStore {
    pub fn put_post(&self, post: &Post) -> StorageResult<()> {
        let cf = self.get_cf(CF_POSTS)?;
        let data = serialize_with_version(post)?;

        self.db
            .put_cf(cf, post_key(&post.id), &data)
            .map_err(|e| StorageError::rocksdb_op("put", CF_POSTS, Some(&post.id.to_string()), e))?;

        debug!(post_id = %post.id, tags = post.tags.len(), "Stored post");
        Ok(())
    }

    pub fn get_post(&self, post_id: &PostId) -> StorageResult<Option<Post>> {
        let cf = self.get_cf(CF_POSTS)?;
        let id = post_id.to_string();

        match self.db.get_cf(cf, post_key(post_id)) {
            Ok(Some(data)) => Ok(Some(deserialize_with_version(&data, CF_POSTS, &id)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_POSTS, Some(&id), e)),
        }
    }

    pub fn get_vote(&self, user_id: &UserId, post_id: &PostId) -> StorageResult<Option<StoredVote>> {
        let cf = self.get_cf(CF_VOTES)?;
        let id = format!("{}:{}", user_id, post_id);

        match self.db.get_cf(cf, vote_key(user_id, post_id)) {
            Ok(Some(data)) => Ok(Some(deserialize_with_version(&data, CF_VOTES, &id)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_VOTES, Some(&id), e)),
        }
    }

    /// Cast a vote with toggle semantics.
    ///
    /// - no earlier vote: store it -> `Created`
    /// - same value again: withdraw it -> `Removed`
    /// - opposite value: flip it, keeping the original timestamp -> `Updated`
    ///
    /// The vote row and its time-index entry change in one `WriteBatch`.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` - Unknown user or post
    pub fn record_vote(
        &self,
        user_id: &UserId,
        post_id: &PostId,
        value: VoteValue,
        at: DateTime<Utc>,
    ) -> StorageResult<VoteOutcome> {
        if self.get_profile(user_id)?.is_none() {
            return Err(StorageError::not_found("User", user_id));
        }
        if self.get_post(post_id)?.is_none() {
            return Err(StorageError::not_found("Post", post_id));
        }

        let votes_cf = self.get_cf(CF_VOTES)?;
        let times_cf = self.get_cf(CF_VOTE_TIMES)?;
        let key = vote_key(user_id, post_id);
        let id = format!("{}:{}", user_id, post_id);

        let mut batch = WriteBatch::default();
        let outcome = match self.get_vote(user_id, post_id)? {
            None => {
                let stored = StoredVote {
                    value,
                    created_at: at,
                };
                batch.put_cf(votes_cf, key, serialize_with_version(&stored)?);
                batch.put_cf(times_cf, vote_time_key(&at, user_id, post_id), b"");
                VoteOutcome::Created
            }
            Some(existing) if existing.value == value => {
                batch.delete_cf(votes_cf, key);
                batch.delete_cf(
                    times_cf,
                    vote_time_key(&existing.created_at, user_id, post_id),
                );
                VoteOutcome::Removed
            }
            Some(existing) => {
                let stored = StoredVote {
                    value,
                    created_at: existing.created_at,
                };
                batch.put_cf(votes_cf, key, serialize_with_version(&stored)?);
                VoteOutcome::Updated
            }
        };

        self.db
            .write(batch)
            .map_err(|e| StorageError::rocksdb_op("write_batch", CF_VOTES, Some(&id), e))?;

        debug!(user_id = %user_id, post_id = %post_id, ?outcome, "Recorded vote");
        Ok(outcome)
    }

    /// Votes with `created_at >= since`, counted from the time index.
    pub fn count_votes_since_sync(&self, since: DateTime<Utc>) -> StorageResult<u64> {
        let cf = self.get_cf(CF_VOTE_TIMES)?;
        let start = vote_time_prefix(&since);
        let mut count = 0u64;

        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(&start, Direction::Forward))
        {
            item.map_err(|e| StorageError::rocksdb_op("iterate", CF_VOTE_TIMES, None, e))?;
            count += 1;
        }

        Ok(count)
    }

    fn load_post_tags(&self) -> StorageResult<HashMap<PostId, Vec<String>>> {
        let cf = self.get_cf(CF_POSTS)?;
        let mut tags = HashMap::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) =
                item.map_err(|e| StorageError::rocksdb_op("iterate", CF_POSTS, None, e))?;
            let post: Post = deserialize_with_version(&value, CF_POSTS, "<scan>")?;
            tags.insert(post.id, post.tags);
        }

        Ok(tags)
    }

    /// Every user (key order) with every vote, joined with post tags.
    pub fn snapshot_sync(&self) -> StorageResult<Vec<VoterSnapshot>> {
        let tags = self.load_post_tags()?;
        let mut rows: Vec<VoterSnapshot> = self
            .list_profiles()?
            .into_iter()
            .map(|p| VoterSnapshot {
                user_id: p.id,
                observer: p.observer,
                votes: Vec::new(),
            })
            .collect();
        let index: HashMap<UserId, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.user_id.clone(), i))
            .collect();

        let cf = self.get_cf(CF_VOTES)?;
        let mut total = 0usize;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) =
                item.map_err(|e| StorageError::rocksdb_op("iterate", CF_VOTES, None, e))?;
            let (user_id, post_id) = parse_vote_key(&key)?;
            let stored: StoredVote =
                deserialize_with_version(&value, CF_VOTES, &format!("{}:{}", user_id, post_id))?;

            let Some(&row) = index.get(&user_id) else {
                warn!(user_id = %user_id, "Vote by unknown user ignored");
                continue;
            };
            let topics = tags.get(&post_id).cloned().unwrap_or_default();
            rows[row]
                .votes
                .push(CastVote::new(post_id, stored.value, topics));
            total += 1;
        }

        debug!(users = rows.len(), votes = total, "Built vote snapshot");
        Ok(rows)
    }
}
