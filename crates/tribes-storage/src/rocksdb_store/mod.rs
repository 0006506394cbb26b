//! RocksDB-backed storage for the tribes clustering job.
//!
//! Holds the application data the job reads (users, posts, votes) and the
//! cluster assignments it writes back.
//!
//! # FAIL FAST Policy
//!
//! **NO FALLBACKS. NO MOCK DATA.**
//!
//! Every RocksDB operation that fails returns a detailed error with:
//! - The operation that failed
//! - The column family involved
//! - The key being accessed
//! - The underlying RocksDB error
//!
//! # Thread Safety
//!
//! The store is thread-safe for concurrent reads and writes via RocksDB's
//! internal locking. Topic merges are atomic through the topic_clusters
//! merge operator.
//!
//! # Module Structure
//!
//! - `users` - Profiles and assembled user records
//! - `votes` - Posts, vote ingestion, snapshot and activity counts
//! - `clusters` - Global and topic assignments
//! - `trait_impl` - tribes-core trait implementations

mod clusters;
mod trait_impl;
mod users;
mod votes;

use std::path::{Path, PathBuf};

use rocksdb::{Cache, ColumnFamily, Options, DB};
use tracing::{debug, error, info};

use crate::column_families::{get_tribe_cf_descriptors, TRIBE_CFS};
use crate::config::TribeStoreConfig;
use crate::error::{StorageError, StorageResult};

/// RocksDB-backed tribes store.
///
/// # Example
///
/// ```no_run
/// use tribes_storage::RocksDbTribeStore;
/// use tribes_core::types::{UserId, UserRecord};
///
/// let store = RocksDbTribeStore::open("/tmp/tribes-db").unwrap();
/// let id = UserId::new();
/// store.put_user(&UserRecord::new(id.clone(), "alice")).unwrap();
/// assert!(store.get_user_record(&id).unwrap().is_some());
/// ```
pub struct RocksDbTribeStore {
    /// The RocksDB database instance.
    db: DB,
    /// Shared block cache across column families.
    #[allow(dead_code)]
    cache: Cache,
    /// Database path.
    path: PathBuf,
}

impl RocksDbTribeStore {
    /// Open a store at the specified path with default configuration.
    ///
    /// Creates the database and all 6 column families if they don't exist.
    ///
    /// # Errors
    ///
    /// - `StorageError::OpenFailed` - Path invalid, permissions denied, or DB locked
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::open_with_config(path, TribeStoreConfig::default())
    }

    /// Open a store with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: TribeStoreConfig,
    ) -> StorageResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let path_str = path_buf.to_string_lossy().to_string();

        info!(
            "Opening RocksDbTribeStore at '{}' with cache_size={}MB",
            path_str,
            config.block_cache_size / (1024 * 1024)
        );

        // Create shared block cache
        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);

        if !config.enable_wal {
            db_opts.set_manual_wal_flush(true);
        }

        let cf_descriptors = get_tribe_cf_descriptors(&cache);

        debug!(
            "Opening database with {} column families",
            cf_descriptors.len()
        );

        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            error!("Failed to open RocksDB at '{}': {}", path_str, e);
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        info!(
            "Successfully opened RocksDbTribeStore with {} column families",
            TRIBE_CFS.len()
        );

        Ok(Self {
            db,
            cache,
            path: path_buf,
        })
    }

    /// Get a column family handle by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ColumnFamilyNotFound` if CF doesn't exist.
    pub(crate) fn get_cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: name.to_string(),
            })
    }

    /// Get the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Health check: verify all column families are accessible.
    pub fn health_check(&self) -> StorageResult<()> {
        for cf_name in TRIBE_CFS {
            self.get_cf(cf_name)?;
        }
        Ok(())
    }

    /// Flush all memtables to disk.
    pub fn flush(&self) -> StorageResult<()> {
        for &cf_name in TRIBE_CFS {
            let cf = self.get_cf(cf_name)?;
            self.db
                .flush_cf(cf)
                .map_err(|e| StorageError::rocksdb_op("flush", cf_name, None, e))?;
        }
        Ok(())
    }
}
