//! The clustering batch job.
//!
//! One run:
//!
//! 1. Consult the [`ActivityGate`] (unless forced)
//! 2. Fetch the vote snapshot once from the [`VoteSource`]
//! 3. Run the global scope, then each configured topic in order
//!
//! Scopes run sequentially over the same snapshot. A skipped or failed scope
//! never stops the ones after it; only configuration, gate and snapshot
//! failures abort the run.
//!
//! The job does not guard against two runs overlapping. Deployments must
//! serialize runs (one scheduler, one process at a time).

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::clustering::Partitioner;
use crate::config::Config;
use crate::error::{TribeError, TribeResult};
use crate::gate::{ActivityGate, GateDecision};
use crate::scope::{ScopeReport, ScopeRunner};
use crate::traits::{ActivityCounter, ClusterStore, VoteSource};
use crate::types::Scope;

/// Summary of a job run.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub started_at: DateTime<Utc>,
    pub gate: GateDecision,
    /// Users in the snapshot, observers included. 0 when the gate skipped.
    pub snapshot_users: usize,
    /// One report per scope, global first.
    pub scopes: Vec<ScopeReport>,
    pub elapsed: Duration,
}

impl JobReport {
    /// Whether scopes were run at all.
    #[inline]
    pub fn ran(&self) -> bool {
        self.gate.should_run()
    }

    pub fn scope(&self, scope: &Scope) -> Option<&ScopeReport> {
        self.scopes.iter().find(|r| &r.scope == scope)
    }

    pub fn completed_count(&self) -> usize {
        self.scopes.iter().filter(|r| r.is_completed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.scopes.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.scopes.iter().filter(|r| r.is_failed()).count()
    }
}

/// Wires the gate, the snapshot and the scope passes together.
pub struct ClusteringJob<'a> {
    source: &'a dyn VoteSource,
    counter: &'a dyn ActivityCounter,
    store: &'a dyn ClusterStore,
    config: Config,
    partitioner: Option<&'a dyn Partitioner>,
}

impl<'a> ClusteringJob<'a> {
    pub fn new(
        source: &'a dyn VoteSource,
        counter: &'a dyn ActivityCounter,
        store: &'a dyn ClusterStore,
        config: Config,
    ) -> Self {
        Self {
            source,
            counter,
            store,
            config,
            partitioner: None,
        }
    }

    /// Use `partitioner` for every scope instead of the configured k-means.
    pub fn with_partitioner(mut self, partitioner: &'a dyn Partitioner) -> Self {
        self.partitioner = Some(partitioner);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scopes in processing order: global, then topics as configured.
    pub fn scopes(&self) -> Vec<Scope> {
        std::iter::once(Scope::Global)
            .chain(self.config.clustering.topics.iter().map(Scope::topic))
            .collect()
    }

    /// Run the job if the activity gate allows it.
    ///
    /// # Errors
    ///
    /// Only fatal errors: `Config`, `Gate` or `Source`.
    pub async fn run(&self, now: DateTime<Utc>) -> TribeResult<JobReport> {
        let started = Instant::now();
        self.config.validate()?;

        let gate = ActivityGate::new(self.counter, &self.config.gate)?;
        let decision = gate.check(now).await?;
        if !decision.should_run() {
            return Ok(JobReport {
                started_at: now,
                gate: decision,
                snapshot_users: 0,
                scopes: Vec::new(),
                elapsed: started.elapsed(),
            });
        }

        self.run_scopes(now, decision, started).await
    }

    /// Run every scope regardless of recent activity.
    ///
    /// # Errors
    ///
    /// Only fatal errors: `Config` or `Source`.
    pub async fn run_without_gate(&self) -> TribeResult<JobReport> {
        let started = Instant::now();
        self.config.validate()?;
        self.run_scopes(Utc::now(), GateDecision::Bypassed, started)
            .await
    }

    async fn run_scopes(
        &self,
        started_at: DateTime<Utc>,
        gate: GateDecision,
        started: Instant,
    ) -> TribeResult<JobReport> {
        let mut runner = ScopeRunner::new(self.store, &self.config.clustering)?;
        if let Some(partitioner) = self.partitioner {
            runner = runner.with_partitioner(Box::new(partitioner));
        }

        let snapshot = self.source.snapshot().await.map_err(|e| {
            error!(error = %e, "Failed to fetch vote snapshot");
            match e {
                TribeError::Source(_) => e,
                other => TribeError::Source(other.to_string()),
            }
        })?;

        info!(
            users = snapshot.len(),
            topics = self.config.clustering.topics.len(),
            "Starting clustering run"
        );

        let mut scopes = Vec::new();
        for scope in self.scopes() {
            scopes.push(runner.run(&scope, &snapshot).await);
        }

        let report = JobReport {
            started_at,
            gate,
            snapshot_users: snapshot.len(),
            scopes,
            elapsed: started.elapsed(),
        };

        info!(
            completed = report.completed_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Clustering run finished"
        );

        Ok(report)
    }
}
