//! Backend health — metrics, restart decisions and probe scheduling.
//!
//! The tracker and policy are synchronous and I/O free. Probing lives in
//! [`probe`] and only talks to them through the orchestrator lock.

pub mod metrics;
pub mod policy;
pub mod probe;
pub mod tracker;

pub use metrics::BackendMetrics;
pub use policy::{RestartPolicy, RestartState};
pub use probe::{probe_all, spawn_monitor, HealthProber, ProbeRound};
pub use tracker::{BackendHealthReport, FailureEvent, HealthCheckResult, HealthTracker};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health and restart thresholds (configurable, not hardcoded).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Consecutive failures before a restart is considered (default: 3).
    pub max_consecutive_failures: u64,
    /// Minimum time since the last failure before a restart (default: 5 minutes).
    #[serde(with = "humantime_serde")]
    pub restart_cooldown: Duration,
    /// Checks required before a backend can be reported degraded (default: 5).
    pub degraded_min_samples: u64,
    /// Availability below this fraction is degraded (default: 0.95).
    pub degraded_threshold: f64,
    /// Raw check results retained across all backends (default: 1000).
    pub history_limit: usize,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 3,
            restart_cooldown: Duration::from_secs(300),
            degraded_min_samples: 5,
            degraded_threshold: 0.95,
            history_limit: 1000,
        }
    }
}
