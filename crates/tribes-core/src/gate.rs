//! Re-clustering gate.
//!
//! Clustering is only worth re-running once enough new votes have arrived.
//! The gate counts votes inside a trailing window and lets the job proceed
//! when the count reaches the configured minimum.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GateConfig;
use crate::error::{TribeError, TribeResult};
use crate::traits::ActivityCounter;

/// Whether the job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Proceed { recent_votes: u64, required: u64 },
    Skip { recent_votes: u64, required: u64 },
    /// The gate was not consulted (forced run).
    Bypassed,
}

impl GateDecision {
    #[inline]
    pub fn should_run(&self) -> bool {
        !matches!(self, Self::Skip { .. })
    }
}

/// Counts recent votes through an [`ActivityCounter`].
pub struct ActivityGate<'a> {
    counter: &'a dyn ActivityCounter,
    min_new_votes: u64,
    window: Duration,
}

impl<'a> ActivityGate<'a> {
    /// # Errors
    ///
    /// `TribeError::Config` if the gate settings are invalid.
    pub fn new(counter: &'a dyn ActivityCounter, config: &GateConfig) -> TribeResult<Self> {
        config.validate()?;
        let window = i64::try_from(config.window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| TribeError::config("gate.window_secs is out of range"))?;
        Ok(Self {
            counter,
            min_new_votes: config.min_new_votes,
            window,
        })
    }

    /// Count votes in `[now - window, now]` and decide.
    ///
    /// # Errors
    ///
    /// - `TribeError::Config` if the window reaches before the earliest
    ///   representable time
    /// - `TribeError::Gate` if the count could not be executed
    ///
    /// Both are fatal for the job.
    pub async fn check(&self, now: DateTime<Utc>) -> TribeResult<GateDecision> {
        let since = now
            .checked_sub_signed(self.window)
            .ok_or_else(|| TribeError::config("gate.window_secs is out of range"))?;
        let recent_votes = self
            .counter
            .count_votes_since(since)
            .await
            .map_err(|e| match e {
                TribeError::Gate(_) => e,
                other => TribeError::Gate(other.to_string()),
            })?;

        debug!(%since, recent_votes, required = self.min_new_votes, "Activity count");

        let required = self.min_new_votes;
        if recent_votes < required {
            info!(recent_votes, required, "Not enough new activity, skipping run");
            Ok(GateDecision::Skip {
                recent_votes,
                required,
            })
        } else {
            Ok(GateDecision::Proceed {
                recent_votes,
                required,
            })
        }
    }
}
