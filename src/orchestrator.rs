//! Orchestrator - owns every subsystem for one fleet of backends.
//!
//! Subsystems (registry, router, tracker, policy) are plain structs owned here
//! and called via &mut self. Concurrent callers share a
//! [`SharedOrchestrator`]; the single lock keeps metric updates atomic and
//! gives `needs_restart` a consistent snapshot.

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::{Arguments, BackendDescriptor, BackendRegistry, BackendStatus, ToolCall};
use crate::clock::{system_clock, SharedClock};
use crate::health::{
    BackendHealthReport, FailureEvent, HealthCheckResult, HealthConfig, HealthTracker,
    RestartPolicy, RestartState,
};
use crate::routing::ToolRouter;
use crate::types::{Config, Result};
use crate::workflow::{self, StepOutcome};

pub type SharedOrchestrator = Arc<Mutex<Orchestrator>>;

pub struct Orchestrator {
    registry: BackendRegistry,
    router: ToolRouter,
    tracker: HealthTracker,
    policy: RestartPolicy,
    health: HealthConfig,
    clock: SharedClock,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("router", &self.router)
            .field("tracker", &self.tracker)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: &Config, clock: SharedClock) -> Self {
        Self {
            registry: BackendRegistry::new(),
            router: ToolRouter::new(config.capability_table()),
            tracker: HealthTracker::new(config.health.history_limit),
            policy: RestartPolicy::from_config(&config.health),
            health: config.health.clone(),
            clock,
        }
    }

    /// Register every descriptor produced by a config loader.
    pub fn load<I>(&mut self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = BackendDescriptor>,
    {
        let mut count = 0;
        for descriptor in descriptors {
            self.registry.register(descriptor);
            count += 1;
        }
        count
    }

    pub fn into_shared(self) -> SharedOrchestrator {
        Arc::new(Mutex::new(self))
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn router(&self) -> &ToolRouter {
        &self.router
    }

    pub fn tracker(&self) -> &HealthTracker {
        &self.tracker
    }

    pub fn policy(&self) -> &RestartPolicy {
        &self.policy
    }

    pub fn clock(&self) -> SharedClock {
        self.clock.clone()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    // =========================================================================
    // Backends
    // =========================================================================

    pub fn register_backend(&mut self, descriptor: BackendDescriptor) {
        self.registry.register(descriptor);
    }

    /// Remove a backend together with its tool mappings and health data.
    pub fn deregister_backend(&mut self, name: &str) -> Result<BackendDescriptor> {
        let removed = self.registry.deregister(name)?;
        let dropped_tools = self.router.forget_backend(name);
        self.tracker.forget(name);
        tracing::debug!(backend = %name, dropped_tools, "backend state cleared");
        Ok(removed)
    }

    /// Status report from the process supervisor.
    pub fn set_status(&mut self, name: &str, status: BackendStatus) -> Result<()> {
        self.registry.set_status(name, status)
    }

    pub fn statuses(&self) -> BTreeMap<String, BackendStatus> {
        self.registry.list_statuses()
    }

    // =========================================================================
    // Routing and workflows
    // =========================================================================

    pub fn register_tool(&mut self, tool: &str, backend: &str) -> Result<()> {
        self.router.register_tool(&self.registry, tool, backend)
    }

    pub fn register_capabilities(&mut self) -> usize {
        self.router.register_capabilities(&self.registry)
    }

    pub fn route(&self, tool: &str, arguments: Arguments) -> Result<ToolCall> {
        self.router.route(&self.registry, tool, arguments)
    }

    pub fn execute(&self, steps: &[ToolCall]) -> Vec<StepOutcome> {
        workflow::execute(&self.registry, steps)
    }

    // =========================================================================
    // Health
    // =========================================================================

    pub fn record_check(&mut self, result: HealthCheckResult) -> Result<Option<FailureEvent>> {
        self.tracker.record_check(result)
    }

    pub fn needs_restart(&self, name: &str) -> bool {
        self.policy.needs_restart(self.tracker.metrics(name), self.now())
    }

    /// `None` until the backend has been checked at least once.
    pub fn restart_state(&self, name: &str) -> Option<RestartState> {
        let now = self.now();
        self.tracker.metrics(name).map(|m| self.policy.state(m, now))
    }

    /// Every tracked backend currently eligible for restart, sorted.
    pub fn restart_candidates(&self) -> Vec<String> {
        let now = self.now();
        self.tracker
            .tracked()
            .into_iter()
            .filter(|name| self.policy.needs_restart(self.tracker.metrics(name), now))
            .collect()
    }

    pub fn health_report(&self) -> BTreeMap<String, BackendHealthReport> {
        self.tracker.report(&self.policy, self.now())
    }

    /// Degraded backends using the configured sample floor and threshold.
    pub fn degraded(&self) -> Vec<String> {
        self.tracker
            .degraded(self.health.degraded_min_samples, self.health.degraded_threshold)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
