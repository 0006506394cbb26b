//! `run` command: one clustering pass over the store.
//!
//! Prints the JSON [`JobReport`](tribes_core::JobReport) to stdout. A gate
//! skip, skipped scopes and failed scopes all exit 0; only fatal job errors
//! make the command fail.
//!
//! Two overlapping runs against the same database are not supported. RocksDB
//! holds an exclusive lock on the directory, so a second process fails to
//! open the store and exits 1.

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use tribes_core::{ClusteringJob, Config};
use tribes_storage::RocksDbTribeStore;

use super::print_json;

/// Arguments for the `run` command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Cluster even if too few votes arrived since the last window
    #[arg(long)]
    pub force: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the `run` command.
pub async fn run_command(
    args: RunArgs,
    store: &RocksDbTribeStore,
    config: Config,
) -> anyhow::Result<()> {
    let job = ClusteringJob::new(store, store, store, config);

    let report = if args.force {
        info!("run: --force given, bypassing activity gate");
        job.run_without_gate().await
    } else {
        job.run(Utc::now()).await
    }
    .context("Clustering job failed")?;

    if !report.ran() {
        info!(gate = ?report.gate, "run: activity gate closed, nothing clustered");
    } else if report.failed_count() > 0 {
        warn!(
            failed = report.failed_count(),
            "run: some scopes failed, see report"
        );
    }

    store.flush().context("Failed to flush tribe store")?;
    print_json(&report, args.pretty)
}
