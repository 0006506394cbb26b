//! Storage error types.
//!
//! Every RocksDB failure carries the operation, column family and key, so a
//! failed write can be traced without reproducing it.

use thiserror::Error;
use tribes_core::error::TribeError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// RocksDB operation failed.
    #[error("RocksDB {operation} failed on CF '{cf}' with key '{key:?}': {source}")]
    RocksDbOperation {
        operation: &'static str,
        cf: &'static str,
        key: Option<String>,
        #[source]
        source: rocksdb::Error,
    },

    /// Database failed to open at the specified path.
    #[error("Failed to open RocksDB at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// Column family not found in the database.
    #[error("Column family '{name}' not found in database")]
    ColumnFamilyNotFound { name: String },

    /// Entity not found by ID.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Serialization error.
    #[error("Serialization error for {type_name}: {message}")]
    Serialization {
        type_name: &'static str,
        message: String,
    },

    /// Deserialization error.
    #[error("Deserialization error for key '{key}' in CF '{cf}': {message}")]
    Deserialization {
        cf: &'static str,
        key: String,
        message: String,
    },

    /// Version mismatch error.
    #[error("Version mismatch in CF '{cf}': expected {expected}, got {actual}")]
    VersionMismatch {
        cf: &'static str,
        expected: u8,
        actual: u8,
    },

    /// A stored key does not have the layout its column family requires.
    #[error("Malformed key in CF '{cf}': expected {expected} bytes, got {actual}")]
    InvalidKey {
        cf: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl StorageError {
    /// Create a RocksDB operation error.
    pub(crate) fn rocksdb_op(
        operation: &'static str,
        cf: &'static str,
        key: Option<&str>,
        source: rocksdb::Error,
    ) -> Self {
        Self::RocksDbOperation {
            operation,
            cf,
            key: key.map(String::from),
            source,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether the error indicates on-disk data that cannot be trusted.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Deserialization { .. } | Self::VersionMismatch { .. } | Self::InvalidKey { .. } => {
                true
            }
            Self::RocksDbOperation { source, .. } => {
                matches!(source.kind(), rocksdb::ErrorKind::Corruption)
            }
            _ => false,
        }
    }
}

impl From<StorageError> for TribeError {
    fn from(e: StorageError) -> Self {
        TribeError::Storage(e.to_string())
    }
}

/// Convenient Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
