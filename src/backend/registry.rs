//! Backend registry - the set of known backends and their lifecycle status.
//!
//! NOT a separate actor - owned by the Orchestrator and called via &mut self.
//! Status is mutated only here, on behalf of process-supervisor reports.

use std::collections::{BTreeMap, HashMap};

use super::types::{BackendDescriptor, BackendStatus};
use crate::types::{Error, Result};

#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, BackendDescriptor>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Insert or replace a backend by name.
    pub fn register(&mut self, descriptor: BackendDescriptor) {
        tracing::info!(
            backend = %descriptor.name,
            command = %descriptor.command,
            "backend registered"
        );
        self.backends.insert(descriptor.name.clone(), descriptor);
    }

    /// Remove a backend, returning its descriptor.
    pub fn deregister(&mut self, name: &str) -> Result<BackendDescriptor> {
        let removed = self
            .backends
            .remove(name)
            .ok_or_else(|| Error::unknown_backend(name))?;
        tracing::info!(backend = %name, "backend deregistered");
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Result<&BackendDescriptor> {
        self.backends
            .get(name)
            .ok_or_else(|| Error::not_found(format!("backend {}", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Current status, `None` if the backend is not registered.
    pub fn status(&self, name: &str) -> Option<BackendStatus> {
        self.backends.get(name).map(|b| b.status)
    }

    /// Apply a status reported by the process supervisor.
    pub fn set_status(&mut self, name: &str, status: BackendStatus) -> Result<()> {
        let backend = self
            .backends
            .get_mut(name)
            .ok_or_else(|| Error::unknown_backend(name))?;

        let previous = backend.status;
        backend.status = status;
        tracing::debug!(backend = %name, from = %previous, to = %status, "backend status changed");
        Ok(())
    }

    /// Snapshot of name → status, ordered by name.
    pub fn list_statuses(&self) -> BTreeMap<String, BackendStatus> {
        self.backends
            .iter()
            .map(|(name, b)| (name.clone(), b.status))
            .collect()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }

    /// Cloned descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<BackendDescriptor> {
        let mut all: Vec<BackendDescriptor> = self.backends.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
