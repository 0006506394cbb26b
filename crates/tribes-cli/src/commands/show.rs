//! `show` command: print one user's cluster fields.

use anyhow::Context;
use clap::Args;
use uuid::Uuid;

use tribes_core::types::UserId;
use tribes_storage::{RocksDbTribeStore, StorageError};

use super::print_json;

/// Arguments for the `show` command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// User id (uuid)
    pub user_id: Uuid,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the `show` command.
///
/// An unknown user is an error (exit 1).
pub fn show_command(args: ShowArgs, store: &RocksDbTribeStore) -> anyhow::Result<()> {
    let user_id = UserId::from(args.user_id);
    let record = store
        .get_user_record(&user_id)
        .with_context(|| format!("Failed to read user {}", user_id))?
        .ok_or_else(|| StorageError::NotFound {
            kind: "User",
            id: user_id.to_string(),
        })?;

    print_json(&record, args.pretty)
}
