//! Versioned bincode encoding for stored values.
//!
//! Every value is prefixed with [`STORAGE_VERSION`]. Bump it when a stored
//! struct's layout changes; mismatches are reported, never guessed around.

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Serialization version for all stored types.
pub const STORAGE_VERSION: u8 = 1;

/// Serialize a value with version prefix.
pub fn serialize_with_version<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    let mut result = vec![STORAGE_VERSION];
    let encoded = bincode::serialize(value).map_err(|e| StorageError::Serialization {
        type_name: std::any::type_name::<T>(),
        message: e.to_string(),
    })?;
    result.extend(encoded);
    Ok(result)
}

/// Deserialize a value with version check.
pub fn deserialize_with_version<T: for<'de> Deserialize<'de>>(
    data: &[u8],
    cf: &'static str,
    key: &str,
) -> StorageResult<T> {
    if data.is_empty() {
        return Err(StorageError::Deserialization {
            cf,
            key: key.to_string(),
            message: "Empty data".to_string(),
        });
    }

    let version = data[0];
    if version != STORAGE_VERSION {
        return Err(StorageError::VersionMismatch {
            cf,
            expected: STORAGE_VERSION,
            actual: version,
        });
    }

    bincode::deserialize(&data[1..]).map_err(|e| StorageError::Deserialization {
        cf,
        key: key.to_string(),
        message: e.to_string(),
    })
}
