//! Restart policy — decides restart eligibility from metrics and a clock.
//!
//! State per backend:
//! ```text
//! HEALTHY ──(consecutive ≥ max)──→ FAILING ──(cooldown elapsed)──→ RESTART_ELIGIBLE
//!    ↑                                                                  │
//!    └──────────────── healthy check resets the streak ─────────────────┘
//! ```
//!
//! Read-only: the policy never resets counters. Cooldown is measured from the
//! most recent failure, so a backend that keeps failing keeps postponing its
//! own restart instead of being restarted in a loop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::metrics::BackendMetrics;
use super::HealthConfig;

/// Restart classification of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartState {
    Healthy,
    Failing,
    RestartEligible,
}

#[derive(Debug, Clone)]
pub struct RestartPolicy {
    max_consecutive_failures: u64,
    cooldown: Duration,
}

impl RestartPolicy {
    /// A threshold of zero is treated as one.
    pub fn new(max_consecutive_failures: u64, cooldown: Duration) -> Self {
        Self {
            max_consecutive_failures: max_consecutive_failures.max(1),
            cooldown,
        }
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(config.max_consecutive_failures, config.restart_cooldown)
    }

    pub fn max_consecutive_failures(&self) -> u64 {
        self.max_consecutive_failures
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn state(&self, metrics: &BackendMetrics, now: DateTime<Utc>) -> RestartState {
        if metrics.consecutive_failures() < self.max_consecutive_failures {
            return RestartState::Healthy;
        }

        match metrics.last_failure() {
            Some(last) if self.in_cooldown(last, now) => RestartState::Failing,
            _ => RestartState::RestartEligible,
        }
    }

    /// False for backends without metrics: no data yet is a steady state.
    pub fn needs_restart(&self, metrics: Option<&BackendMetrics>, now: DateTime<Utc>) -> bool {
        metrics.map_or(false, |m| self.state(m, now) == RestartState::RestartEligible)
    }

    fn in_cooldown(&self, last_failure: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A negative elapsed time (clock behind the failure) counts as in cooldown.
        match (now - last_failure).to_std() {
            Ok(elapsed) => elapsed < self.cooldown,
            Err(_) => true,
        }
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::from_config(&HealthConfig::default())
    }
}
