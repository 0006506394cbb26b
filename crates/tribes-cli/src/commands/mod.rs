//! CLI command handlers
//!
//! - `run`: run the clustering job once and print its report
//! - `import`: load users, posts and votes from a JSON seed document
//! - `show`: print one user's cluster fields

pub mod import;
pub mod run;
pub mod show;

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tribes_core::Config;
use tribes_storage::{RocksDbTribeStore, TribeStoreConfig};

/// Open the store at `--db` if given, otherwise at `storage.path`.
///
/// The returned handle is owned by the caller for the rest of the command and
/// closed when it drops.
pub fn open_store(config: &Config, db_override: Option<&Path>) -> anyhow::Result<RocksDbTribeStore> {
    let path = db_override.unwrap_or_else(|| Path::new(&config.storage.path));
    info!(path = %path.display(), "Opening tribe store");

    let store = RocksDbTribeStore::open_with_config(path, TribeStoreConfig::from(&config.storage))
        .with_context(|| format!("Failed to open tribe store at {}", path.display()))?;
    store.health_check().context("Tribe store health check failed")?;
    Ok(store)
}

/// Write `value` to stdout as JSON.
pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to encode output as JSON")?;
    println!("{}", out);
    Ok(())
}
