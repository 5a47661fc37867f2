//! Rolling per-backend counters.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Accumulated health metrics for one backend.
///
/// Invariants: `failures <= total_checks`, `consecutive_failures <= failures`.
/// Mutated only by [`super::HealthTracker`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendMetrics {
    total_checks: u64,
    failures: u64,
    /// Sum over healthy checks only.
    cumulative_latency_ms: f64,
    last_failure: Option<DateTime<Utc>>,
    consecutive_failures: u64,
}

impl BackendMetrics {
    pub(crate) fn record_success(&mut self, latency_ms: f64) {
        self.total_checks += 1;
        self.cumulative_latency_ms += latency_ms;
        self.consecutive_failures = 0;
    }

    pub(crate) fn record_failure(&mut self, at: DateTime<Utc>) {
        self.total_checks += 1;
        self.failures += 1;
        self.last_failure = Some(at);
        self.consecutive_failures += 1;
    }

    pub fn total_checks(&self) -> u64 {
        self.total_checks
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn successes(&self) -> u64 {
        self.total_checks - self.failures
    }

    pub fn cumulative_latency_ms(&self) -> f64 {
        self.cumulative_latency_ms
    }

    pub fn last_failure(&self) -> Option<DateTime<Utc>> {
        self.last_failure
    }

    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }

    /// Fraction of healthy checks, 0.0 when nothing was recorded.
    pub fn availability(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        self.successes() as f64 / self.total_checks as f64
    }

    /// Mean latency of healthy checks, 0.0 when there were none.
    pub fn avg_latency_ms(&self) -> f64 {
        let successes = self.successes();
        if successes == 0 {
            return 0.0;
        }
        self.cumulative_latency_ms / successes as f64
    }
}
