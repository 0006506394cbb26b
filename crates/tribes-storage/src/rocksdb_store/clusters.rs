//! Global and topic cluster assignments.

use chrono::Utc;
use tracing::debug;

use tribes_core::types::UserId;

use crate::codec::serialize_with_version;
use crate::column_families::{CF_GLOBAL_CLUSTERS, CF_TOPIC_CLUSTERS};
use crate::error::{StorageError, StorageResult};
use crate::merge::topic_operand;
use crate::schema::user_key;
use crate::types::GlobalAssignment;

use super::RocksDbTribeStore;

impl RocksDbTribeStore {
    fn require_user(&self, user_id: &UserId) -> StorageResult<()> {
        match self.get_profile(user_id)? {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found("User", user_id)),
        }
    }

    /// Overwrite the user's global cluster id and label.
    pub fn set_global_sync(&self, user_id: &UserId, cluster_id: u32, label: &str) -> StorageResult<()> {
        self.require_user(user_id)?;
        let cf = self.get_cf(CF_GLOBAL_CLUSTERS)?;
        let assignment = GlobalAssignment {
            cluster_id,
            label: label.to_string(),
            assigned_at: Utc::now(),
        };
        let data = serialize_with_version(&assignment)?;

        self.db.put_cf(cf, user_key(user_id), &data).map_err(|e| {
            StorageError::rocksdb_op("put", CF_GLOBAL_CLUSTERS, Some(&user_id.to_string()), e)
        })?;

        debug!(user_id = %user_id, cluster_id, "Set global cluster");
        Ok(())
    }

    /// Set one key of the user's topic mapping with a merge operand.
    ///
    /// No read happens here; the merge operator combines the operand with
    /// the stored map inside RocksDB.
    pub fn merge_topic_sync(&self, user_id: &UserId, topic: &str, cluster_id: u32) -> StorageResult<()> {
        self.require_user(user_id)?;
        let cf = self.get_cf(CF_TOPIC_CLUSTERS)?;
        let operand = topic_operand(topic, cluster_id)?;

        self.db.merge_cf(cf, user_key(user_id), &operand).map_err(|e| {
            StorageError::rocksdb_op("merge", CF_TOPIC_CLUSTERS, Some(&user_id.to_string()), e)
        })?;

        debug!(user_id = %user_id, topic, cluster_id, "Merged topic cluster");
        Ok(())
    }
}
