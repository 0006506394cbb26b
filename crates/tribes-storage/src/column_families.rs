//! RocksDB column family definitions.
//!
//! # Column Families (6 total)
//! | Name | Purpose | Key Format | Value |
//! |------|---------|------------|-------|
//! | users | Identity and observer flag | uuid (16 bytes) | UserProfile |
//! | posts | Topic tags | uuid (16 bytes) | Post |
//! | votes | Current vote per (user, post) | uuid:uuid (32 bytes) | StoredVote |
//! | vote_times | Time index for activity counts | ts_ms:uuid:uuid (40 bytes) | empty |
//! | global_clusters | Global assignment | uuid (16 bytes) | GlobalAssignment |
//! | topic_clusters | Topic -> cluster id map | uuid (16 bytes) | TopicClusters (merge operator) |
//!
//! # FAIL FAST Policy
//!
//! All option builders are infallible at construction time. Errors only
//! occur at DB open time, and those are surfaced by RocksDB itself.

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

use crate::merge::{topic_clusters_merge, TOPIC_CLUSTERS_MERGE_OPERATOR};

// =============================================================================
// COLUMN FAMILY NAME CONSTANTS
// =============================================================================

/// User profiles (name, observer flag, creation time).
pub const CF_USERS: &str = "users";

/// Posts with their topic tag names.
pub const CF_POSTS: &str = "posts";

/// Current vote of a user on a post.
/// Key: user uuid (16 bytes) + post uuid (16 bytes) = 32 bytes
pub const CF_VOTES: &str = "votes";

/// Secondary index of votes by creation time.
/// Key: created_at ms (8 bytes BE) + user uuid + post uuid = 40 bytes
pub const CF_VOTE_TIMES: &str = "vote_times";

/// Global cluster id and label per user.
pub const CF_GLOBAL_CLUSTERS: &str = "global_clusters";

/// Per-user topic -> cluster id mapping, written only through merge operands.
pub const CF_TOPIC_CLUSTERS: &str = "topic_clusters";

/// All column family names (6 total).
pub const TRIBE_CFS: &[&str] = &[
    CF_USERS,
    CF_POSTS,
    CF_VOTES,
    CF_VOTE_TIMES,
    CF_GLOBAL_CLUSTERS,
    CF_TOPIC_CLUSTERS,
];

/// Total count of CFs (should be 6).
pub const TRIBE_CF_COUNT: usize = 6;

// =============================================================================
// CF OPTION BUILDERS
// =============================================================================

fn block_options(cache: &Cache) -> BlockBasedOptions {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);
    block_opts
}

/// Options for point-lookup CFs keyed by uuid (users, posts, global_clusters).
///
/// # Configuration
/// - LZ4 compression
/// - Bloom filter for point lookups
pub fn point_lookup_cf_options(cache: &Cache) -> Options {
    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_options(cache));
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.create_if_missing(true);
    opts
}

/// Options for the votes CF (scanned in full for snapshots).
pub fn votes_cf_options(cache: &Cache) -> Options {
    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_options(cache));
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.create_if_missing(true);
    opts
}

/// Options for the vote_times index (empty values, range scans from a time).
///
/// # Configuration
/// - No compression (keys only)
pub fn vote_times_cf_options(cache: &Cache) -> Options {
    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_options(cache));
    opts.set_compression_type(rocksdb::DBCompressionType::None);
    opts.create_if_missing(true);
    opts
}

/// Options for topic_clusters.
///
/// # Configuration
/// - Associative merge operator applying one-key updates in order
pub fn topic_clusters_cf_options(cache: &Cache) -> Options {
    let mut opts = point_lookup_cf_options(cache);
    opts.set_merge_operator_associative(TOPIC_CLUSTERS_MERGE_OPERATOR, topic_clusters_merge);
    opts
}

// =============================================================================
// DESCRIPTOR GETTERS
// =============================================================================

/// Get all 6 column family descriptors.
pub fn get_tribe_cf_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_USERS, point_lookup_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_POSTS, point_lookup_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_VOTES, votes_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_VOTE_TIMES, vote_times_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_GLOBAL_CLUSTERS, point_lookup_cf_options(cache)),
        ColumnFamilyDescriptor::new(CF_TOPIC_CLUSTERS, topic_clusters_cf_options(cache)),
    ]
}
