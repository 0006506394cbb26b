//! Key format functions.
//!
//! All keys use fixed-size formats for efficient range scans.
//! No variable-length prefixes.
//!
//! | CF | Key |
//! |----|-----|
//! | users, global_clusters, topic_clusters | user uuid (16 bytes) |
//! | posts | post uuid (16 bytes) |
//! | votes | user uuid + post uuid (32 bytes) |
//! | vote_times | created_at ms (8 bytes BE) + user uuid + post uuid (40 bytes) |
//!
//! Parsers return [`StorageError::InvalidKey`] on a wrong-sized key instead
//! of guessing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tribes_core::types::{PostId, UserId};

use crate::error::{StorageError, StorageResult};

/// Key for every per-user CF: the user's UUID as 16 bytes.
#[inline]
pub fn user_key(user_id: &UserId) -> [u8; 16] {
    *user_id.as_bytes()
}

#[inline]
pub fn post_key(post_id: &PostId) -> [u8; 16] {
    *post_id.as_bytes()
}

/// Key for the votes CF: user uuid (16 bytes) + post uuid (16 bytes).
///
/// Votes of one user are contiguous.
#[inline]
pub fn vote_key(user_id: &UserId, post_id: &PostId) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(user_id.as_bytes());
    key[16..].copy_from_slice(post_id.as_bytes());
    key
}

/// Milliseconds since the epoch, clamped at 0 so big-endian bytes sort by time.
#[inline]
pub fn timestamp_ms(at: &DateTime<Utc>) -> u64 {
    at.timestamp_millis().max(0) as u64
}

/// Key for the vote_times CF.
///
/// # Returns
/// Exactly 40 bytes: created_at ms (8 bytes BE) + user uuid + post uuid
#[inline]
pub fn vote_time_key(created_at: &DateTime<Utc>, user_id: &UserId, post_id: &PostId) -> [u8; 40] {
    let mut key = [0u8; 40];
    key[..8].copy_from_slice(&timestamp_ms(created_at).to_be_bytes());
    key[8..24].copy_from_slice(user_id.as_bytes());
    key[24..].copy_from_slice(post_id.as_bytes());
    key
}

/// Seek position for "every vote at or after `since`".
#[inline]
pub fn vote_time_prefix(since: &DateTime<Utc>) -> [u8; 8] {
    timestamp_ms(since).to_be_bytes()
}

fn uuid_at(key: &[u8], range: std::ops::Range<usize>) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[range]);
    Uuid::from_bytes(bytes)
}

fn check_len(key: &[u8], cf: &'static str, expected: usize) -> StorageResult<()> {
    if key.len() != expected {
        return Err(StorageError::InvalidKey {
            cf,
            expected,
            actual: key.len(),
        });
    }
    Ok(())
}

/// Parse a 16-byte per-user key.
pub fn parse_user_key(key: &[u8], cf: &'static str) -> StorageResult<UserId> {
    check_len(key, cf, 16)?;
    Ok(UserId::from(uuid_at(key, 0..16)))
}

/// Parse a votes CF key back to (user, post).
pub fn parse_vote_key(key: &[u8]) -> StorageResult<(UserId, PostId)> {
    check_len(key, crate::column_families::CF_VOTES, 32)?;
    Ok((
        UserId::from(uuid_at(key, 0..16)),
        PostId::from(uuid_at(key, 16..32)),
    ))
}

/// Parse a vote_times CF key back to (timestamp_ms, user, post).
pub fn parse_vote_time_key(key: &[u8]) -> StorageResult<(u64, UserId, PostId)> {
    check_len(key, crate::column_families::CF_VOTE_TIMES, 40)?;
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&key[..8]);
    Ok((
        u64::from_be_bytes(ts),
        UserId::from(uuid_at(key, 8..24)),
        PostId::from(uuid_at(key, 24..40)),
    ))
}
