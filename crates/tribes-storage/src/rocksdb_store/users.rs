//! User profiles and assembled user records.

use rocksdb::IteratorMode;
use tracing::debug;

use tribes_core::types::{
    TopicClusters, UserId, UserRecord, OBSERVER_LABEL, UNASSIGNED_CLUSTER_ID, UNASSIGNED_LABEL,
};

use crate::codec::{deserialize_with_version, serialize_with_version};
use crate::column_families::{CF_GLOBAL_CLUSTERS, CF_TOPIC_CLUSTERS, CF_USERS};
use crate::error::{StorageError, StorageResult};
use crate::schema::{parse_user_key, user_key};
use crate::types::{GlobalAssignment, UserProfile};

use super::RocksDbTribeStore;

impl RocksDbTribeStore {
    /// Store a user's identity (name and observer flag).
    ///
    /// Cluster fields of `user` are ignored: they are written only by the
    /// clustering job.
    pub fn put_user(&self, user: &UserRecord) -> StorageResult<()> {
        self.put_profile(&UserProfile::from(user))
    }

    pub fn put_profile(&self, profile: &UserProfile) -> StorageResult<()> {
        let cf = self.get_cf(CF_USERS)?;
        let key = user_key(&profile.id);
        let data = serialize_with_version(profile)?;

        self.db.put_cf(cf, key, &data).map_err(|e| {
            StorageError::rocksdb_op("put", CF_USERS, Some(&profile.id.to_string()), e)
        })?;

        debug!(user_id = %profile.id, observer = profile.observer, "Stored user profile");
        Ok(())
    }

    pub fn get_profile(&self, user_id: &UserId) -> StorageResult<Option<UserProfile>> {
        let cf = self.get_cf(CF_USERS)?;
        let id = user_id.to_string();

        match self.db.get_cf(cf, user_key(user_id)) {
            Ok(Some(data)) => Ok(Some(deserialize_with_version(&data, CF_USERS, &id)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_USERS, Some(&id), e)),
        }
    }

    pub(crate) fn get_global_assignment(
        &self,
        user_id: &UserId,
    ) -> StorageResult<Option<GlobalAssignment>> {
        let cf = self.get_cf(CF_GLOBAL_CLUSTERS)?;
        let id = user_id.to_string();

        match self.db.get_cf(cf, user_key(user_id)) {
            Ok(Some(data)) => Ok(Some(deserialize_with_version(
                &data,
                CF_GLOBAL_CLUSTERS,
                &id,
            )?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_GLOBAL_CLUSTERS, Some(&id), e)),
        }
    }

    /// Read the user's topic mapping. An absent value is an empty mapping.
    pub fn get_topic_clusters(&self, user_id: &UserId) -> StorageResult<TopicClusters> {
        let cf = self.get_cf(CF_TOPIC_CLUSTERS)?;
        let id = user_id.to_string();

        match self.db.get_cf(cf, user_key(user_id)) {
            Ok(Some(data)) => deserialize_with_version(&data, CF_TOPIC_CLUSTERS, &id),
            Ok(None) => Ok(TopicClusters::new()),
            Err(e) => Err(StorageError::rocksdb_op("get", CF_TOPIC_CLUSTERS, Some(&id), e)),
        }
    }

    /// Join a profile with its cluster fields.
    fn assemble(&self, profile: UserProfile) -> StorageResult<UserRecord> {
        let topic_clusters = self.get_topic_clusters(&profile.id)?;
        let (cluster_id, cluster_label) = match self.get_global_assignment(&profile.id)? {
            Some(assignment) => (assignment.cluster_id, assignment.label),
            None if profile.observer => (UNASSIGNED_CLUSTER_ID, OBSERVER_LABEL.to_string()),
            None => (UNASSIGNED_CLUSTER_ID, UNASSIGNED_LABEL.to_string()),
        };

        Ok(UserRecord {
            id: profile.id,
            name: profile.name,
            observer: profile.observer,
            cluster_id,
            cluster_label,
            topic_clusters,
        })
    }

    /// Full cluster view of a user, `None` if unknown.
    pub fn get_user_record(&self, user_id: &UserId) -> StorageResult<Option<UserRecord>> {
        match self.get_profile(user_id)? {
            Some(profile) => Ok(Some(self.assemble(profile)?)),
            None => Ok(None),
        }
    }

    /// Every profile, in key order.
    pub(crate) fn list_profiles(&self) -> StorageResult<Vec<UserProfile>> {
        let cf = self.get_cf(CF_USERS)?;
        let mut profiles = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) =
                item.map_err(|e| StorageError::rocksdb_op("iterate", CF_USERS, None, e))?;
            let user_id = parse_user_key(&key, CF_USERS)?;
            profiles.push(deserialize_with_version(
                &value,
                CF_USERS,
                &user_id.to_string(),
            )?);
        }

        Ok(profiles)
    }

    /// Every user with cluster fields, in key order.
    pub fn list_users(&self) -> StorageResult<Vec<UserRecord>> {
        self.list_profiles()?
            .into_iter()
            .map(|profile| self.assemble(profile))
            .collect()
    }
}
