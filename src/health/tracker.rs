//! Health tracker — folds health-check results into per-backend metrics.
//!
//! Keyed purely by backend name; it does not consult the registry. A bounded
//! raw history is kept next to the counters for reporting collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::metrics::BackendMetrics;
use super::policy::RestartPolicy;
use crate::types::{Error, Result};

// =============================================================================
// Inputs and outputs
// =============================================================================

/// One probe outcome, produced by a prober.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub backend: String,
    pub healthy: bool,
    /// Meaningful only when `healthy`.
    #[serde(default)]
    pub latency_ms: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthCheckResult {
    pub fn healthy(backend: impl Into<String>, latency_ms: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            backend: backend.into(),
            healthy: true,
            latency_ms,
            timestamp,
            error: None,
        }
    }

    pub fn unhealthy(
        backend: impl Into<String>,
        error: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            backend: backend.into(),
            healthy: false,
            latency_ms: 0.0,
            timestamp,
            error: Some(error.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.backend.is_empty() {
            return Err(Error::validation("health check result has no backend name"));
        }
        if self.healthy && !(self.latency_ms.is_finite() && self.latency_ms >= 0.0) {
            return Err(Error::validation(format!(
                "health check for {} has invalid latency {}",
                self.backend, self.latency_ms
            )));
        }
        Ok(())
    }
}

/// Emitted for every unhealthy check; forwarded to alerting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEvent {
    pub backend: String,
    pub consecutive_failures: u64,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Operator-facing health snapshot for one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendHealthReport {
    /// Percentage in `[0, 100]`.
    pub availability: f64,
    pub avg_latency_ms: f64,
    pub total_checks: u64,
    pub failures: u64,
    pub consecutive_failures: u64,
    pub needs_restart: bool,
}

// =============================================================================
// Tracker
// =============================================================================

#[derive(Debug)]
pub struct HealthTracker {
    metrics: HashMap<String, BackendMetrics>,
    history: VecDeque<HealthCheckResult>,
    history_limit: usize,
}

impl HealthTracker {
    /// `history_limit` bounds the raw result history; 0 disables it.
    pub fn new(history_limit: usize) -> Self {
        Self {
            metrics: HashMap::new(),
            history: VecDeque::with_capacity(history_limit.min(1024)),
            history_limit,
        }
    }

    /// Record a probe outcome. Returns the failure event for unhealthy results.
    ///
    /// Malformed results are rejected before any state changes.
    pub fn record_check(&mut self, result: HealthCheckResult) -> Result<Option<FailureEvent>> {
        result.validate()?;

        let metrics = self.metrics.entry(result.backend.clone()).or_default();

        let event = if result.healthy {
            metrics.record_success(result.latency_ms);
            None
        } else {
            metrics.record_failure(result.timestamp);
            tracing::warn!(
                backend = %result.backend,
                consecutive_failures = metrics.consecutive_failures(),
                error = result.error.as_deref().unwrap_or("unknown"),
                "backend health check failed"
            );
            Some(FailureEvent {
                backend: result.backend.clone(),
                consecutive_failures: metrics.consecutive_failures(),
                error: result.error.clone(),
                timestamp: result.timestamp,
            })
        };

        self.push_history(result);
        Ok(event)
    }

    fn push_history(&mut self, result: HealthCheckResult) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(result);
    }

    pub fn metrics(&self, backend: &str) -> Option<&BackendMetrics> {
        self.metrics.get(backend)
    }

    /// Report for every tracked backend, ordered by name.
    pub fn report(
        &self,
        policy: &RestartPolicy,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, BackendHealthReport> {
        self.metrics
            .iter()
            .map(|(name, m)| {
                let report = BackendHealthReport {
                    availability: m.availability() * 100.0,
                    avg_latency_ms: m.avg_latency_ms(),
                    total_checks: m.total_checks(),
                    failures: m.failures(),
                    consecutive_failures: m.consecutive_failures(),
                    needs_restart: policy.needs_restart(Some(m), now),
                };
                (name.clone(), report)
            })
            .collect()
    }

    /// Backends below `threshold` availability with at least `min_samples`
    /// checks, sorted by name.
    pub fn degraded(&self, min_samples: u64, threshold: f64) -> Vec<String> {
        let mut names: Vec<String> = self
            .metrics
            .iter()
            .filter(|(_, m)| m.total_checks() >= min_samples && m.availability() < threshold)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Retained results for one backend, oldest first.
    pub fn recent_checks(&self, backend: &str) -> Vec<&HealthCheckResult> {
        self.history.iter().filter(|r| r.backend == backend).collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop everything known about a backend.
    pub fn forget(&mut self, backend: &str) -> Option<BackendMetrics> {
        self.history.retain(|r| r.backend != backend);
        self.metrics.remove(backend)
    }

    /// Tracked backend names, sorted.
    pub fn tracked(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new(super::HealthConfig::default().history_limit)
    }
}

// =============================================================================
// Tests
// =============================================================================
