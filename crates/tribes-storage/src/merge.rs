//! Merge operator for the topic_clusters CF.
//!
//! `merge_topic` writes a merge operand holding a single `topic -> id` entry.
//! RocksDB applies operands in write order on top of the stored map, so two
//! writers updating different topics of one user can never drop each other's
//! key. The operation (map union, later entries win) is associative, which
//! lets RocksDB combine operands during compaction.

use rocksdb::MergeOperands;
use tracing::error;

use tribes_core::types::TopicClusters;

use crate::codec::{deserialize_with_version, serialize_with_version};
use crate::column_families::CF_TOPIC_CLUSTERS;

/// Name recorded in the OPTIONS file. Changing it breaks reopening old DBs.
pub const TOPIC_CLUSTERS_MERGE_OPERATOR: &str = "tribes.topic_clusters.v1";

/// Encode a single-key update as a merge operand.
pub fn topic_operand(topic: &str, cluster_id: u32) -> crate::error::StorageResult<Vec<u8>> {
    let mut update = TopicClusters::new();
    update.merge(topic, cluster_id);
    serialize_with_version(&update)
}

/// Associative merge: existing map, then every operand in order.
///
/// Returns `None` (RocksDB reports a corruption) if any input fails to
/// decode.
pub fn topic_clusters_merge(
    key: &[u8],
    existing: Option<&[u8]>,
    operands: &MergeOperands,
) -> Option<Vec<u8>> {
    let key_hex = format!("{:02x?}", key);

    let mut merged = match existing {
        Some(bytes) => match deserialize_with_version::<TopicClusters>(bytes, CF_TOPIC_CLUSTERS, &key_hex) {
            Ok(map) => map,
            Err(e) => {
                error!(error = %e, "Undecodable topic_clusters base value");
                return None;
            }
        },
        None => TopicClusters::new(),
    };

    for operand in operands.iter() {
        match deserialize_with_version::<TopicClusters>(operand, CF_TOPIC_CLUSTERS, &key_hex) {
            Ok(update) => merged.merge_all(update),
            Err(e) => {
                error!(error = %e, "Undecodable topic_clusters merge operand");
                return None;
            }
        }
    }

    match serialize_with_version(&merged) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode merged topic_clusters");
            None
        }
    }
}
