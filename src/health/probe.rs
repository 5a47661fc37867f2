//! Probe driver — runs a prober over every registered backend.
//!
//! Probes run concurrently and outside the orchestrator lock; results are
//! recorded in one batch afterwards. A probe that outlives its timeout is
//! recorded as an unhealthy check rather than blocking the tracker.

use async_trait::async_trait;
use futures::future::join_all;
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::tracker::{FailureEvent, HealthCheckResult};
use crate::backend::BackendDescriptor;
use crate::orchestrator::SharedOrchestrator;
use crate::types::ProbeConfig;

/// Performs the actual network/IPC health call for one backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProber: Send + Sync {
    async fn probe(&self, backend: &BackendDescriptor) -> HealthCheckResult;
}

/// Summary of one probe round.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeRound {
    /// Results accepted by the tracker.
    pub recorded: usize,
    /// Malformed results discarded.
    pub rejected: usize,
    /// Results for backends deregistered while their probe was in flight.
    pub stale: usize,
    pub failures: Vec<FailureEvent>,
    /// Backends eligible for restart after this round.
    pub restart_candidates: Vec<String>,
}

/// Probe every registered backend once and record the results.
pub async fn probe_all(
    orchestrator: &SharedOrchestrator,
    prober: &dyn HealthProber,
    timeout: Duration,
) -> ProbeRound {
    let (descriptors, clock) = {
        let guard = orchestrator.lock().await;
        (guard.registry().descriptors(), guard.clock())
    };

    let probes = descriptors.iter().map(|descriptor| {
        let clock = clock.clone();
        async move {
            match tokio::time::timeout(timeout, prober.probe(descriptor)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        backend = %descriptor.name,
                        timeout = ?timeout,
                        "health probe timed out"
                    );
                    HealthCheckResult::unhealthy(
                        descriptor.name.clone(),
                        format!("health probe timed out after {}ms", timeout.as_millis()),
                        clock.utc(),
                    )
                }
            }
        }
    });
    let results = join_all(probes).await;

    let mut guard = orchestrator.lock().await;
    let mut round = ProbeRound::default();
    for result in results {
        if let Err(e) = result.validate() {
            tracing::warn!(error = %e, "discarding malformed health check result");
            round.rejected += 1;
            continue;
        }
        if !guard.registry().contains(&result.backend) {
            tracing::debug!(backend = %result.backend, "dropping result for deregistered backend");
            round.stale += 1;
            continue;
        }
        match guard.record_check(result) {
            Ok(event) => {
                round.recorded += 1;
                round.failures.extend(event);
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed health check result");
                round.rejected += 1;
            }
        }
    }
    round.restart_candidates = guard.restart_candidates();
    round
}

/// Run probe rounds on `config.interval` until `cancel` fires.
pub fn spawn_monitor(
    orchestrator: SharedOrchestrator,
    prober: Arc<dyn HealthProber>,
    config: ProbeConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval = ?config.interval,
            "health monitor started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("health monitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let round = probe_all(&orchestrator, prober.as_ref(), config.timeout).await;
                    if !round.restart_candidates.is_empty() {
                        tracing::info!(
                            candidates = ?round.restart_candidates,
                            "backends eligible for restart"
                        );
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendStatus;
    use crate::clock::ManualClock;
    use crate::orchestrator::Orchestrator;
    use crate::types::Config;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Probers stamp results with this instant so they agree with the
    // orchestrator's manual clock.
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap()
    }

    fn shared(names: &[&str]) -> SharedOrchestrator {
        let mut config = Config::default();
        config.health.max_consecutive_failures = 1;
        config.health.restart_cooldown = Duration::ZERO;
        let mut orch = Orchestrator::with_clock(&config, Arc::new(ManualClock::new(start())));
        orch.load(
            names
                .iter()
                .map(|n| BackendDescriptor::new(*n, "npx").with_status(BackendStatus::Running)),
        );
        orch.into_shared()
    }

    #[tokio::test]
    async fn test_probe_all_records_every_backend() {
        let orch = shared(&["filesystem", "git"]);
        let mut prober = MockHealthProber::new();
        prober.expect_probe().times(2).returning(|backend| {
            if backend.name == "git" {
                HealthCheckResult::unhealthy(backend.name.clone(), "Connection refused", start())
            } else {
                HealthCheckResult::healthy(backend.name.clone(), 12.5, start())
            }
        });

        let round = probe_all(&orch, &prober, Duration::from_secs(1)).await;
        assert_eq!(round.recorded, 2);
        assert_eq!(round.rejected, 0);
        assert_eq!(round.failures.len(), 1);
        assert_eq!(round.failures[0].backend, "git");
        assert_eq!(round.restart_candidates, vec!["git"]);

        let guard = orch.lock().await;
        assert_eq!(guard.tracker().metrics("filesystem").unwrap().total_checks(), 1);
    }

    #[tokio::test]
    async fn test_malformed_result_rejected() {
        let orch = shared(&["filesystem"]);
        let mut prober = MockHealthProber::new();
        prober
            .expect_probe()
            .returning(|_| HealthCheckResult::healthy("", 1.0, start()));

        let round = probe_all(&orch, &prober, Duration::from_secs(1)).await;
        assert_eq!(round.recorded, 0);
        assert_eq!(round.rejected, 1);
        assert_eq!(round.stale, 0);
    }

    /// Deregisters the backend it is asked about, as a supervisor might
    /// while a round is in flight.
    struct DeregisteringProber(SharedOrchestrator);

    #[async_trait]
    impl HealthProber for DeregisteringProber {
        async fn probe(&self, backend: &BackendDescriptor) -> HealthCheckResult {
            if backend.name == "git" {
                self.0.lock().await.deregister_backend(&backend.name).unwrap();
            }
            HealthCheckResult::unhealthy(backend.name.clone(), "Connection refused", start())
        }
    }

    #[tokio::test]
    async fn test_result_for_deregistered_backend_is_dropped() {
        let orch = shared(&["filesystem", "git"]);
        let prober = DeregisteringProber(orch.clone());

        let round = probe_all(&orch, &prober, Duration::from_secs(1)).await;
        assert_eq!(round.recorded, 1);
        assert_eq!(round.stale, 1);
        assert_eq!(round.rejected, 0);
        assert!(round.failures.iter().all(|f| f.backend != "git"));
        assert_eq!(round.restart_candidates, vec!["filesystem"]);

        let guard = orch.lock().await;
        assert!(!guard.registry().contains("git"));
        assert!(guard.tracker().metrics("git").is_none());
        assert!(guard.health_report().get("git").is_none());
    }

    struct SlowProber;

    #[async_trait]
    impl HealthProber for SlowProber {
        async fn probe(&self, backend: &BackendDescriptor) -> HealthCheckResult {
            tokio::time::sleep(Duration::from_secs(30)).await;
            HealthCheckResult::healthy(backend.name.clone(), 30_000.0, start())
        }
    }

    #[tokio::test]
    async fn test_timeout_becomes_unhealthy_check() {
        let orch = shared(&["memory"]);
        let round = probe_all(&orch, &SlowProber, Duration::from_millis(20)).await;

        assert_eq!(round.recorded, 1);
        let failure = &round.failures[0];
        assert_eq!(failure.backend, "memory");
        assert!(failure.error.as_deref().unwrap_or_default().contains("timed out"));

        let guard = orch.lock().await;
        let history = guard.tracker().recent_checks("memory");
        assert_eq!(history.len(), 1);
        assert!(!history[0].healthy);
    }

    struct CountingProber(AtomicUsize);

    #[async_trait]
    impl HealthProber for CountingProber {
        async fn probe(&self, backend: &BackendDescriptor) -> HealthCheckResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            HealthCheckResult::healthy(backend.name.clone(), 1.0, start())
        }
    }

    #[tokio::test]
    async fn test_monitor_runs_until_cancelled() {
        let orch = shared(&["filesystem"]);
        let prober = Arc::new(CountingProber(AtomicUsize::new(0)));
        let cancel = CancellationToken::new();
        let config = ProbeConfig {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(100),
        };

        let handle = spawn_monitor(orch.clone(), prober.clone(), config, cancel.clone());
        tokio::time::sleep(Duration::from_millis(80)).await;
        cancel.cancel();
        handle.await.unwrap();

        let probes = prober.0.load(Ordering::SeqCst);
        assert!(probes >= 2, "expected several rounds, got {}", probes);
        let guard = orch.lock().await;
        assert_eq!(
            guard.tracker().metrics("filesystem").unwrap().total_checks() as usize,
            probes
        );
    }
}
