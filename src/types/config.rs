//! Configuration structures.
//!
//! Orchestrator settings are read from a JSON file; every section is optional
//! and falls back to its defaults. Backend definitions are not part of this
//! file, they come from an MCP settings file (see [`crate::loader`]).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};
use crate::health::HealthConfig;
use crate::routing::CapabilityTable;

/// Global orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Health tracking and restart thresholds.
    #[serde(default)]
    pub health: HealthConfig,

    /// Probe scheduling.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Capability table override. `None` means the conventional table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<CapabilityTable>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config_not_found(path));
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::invalid_config(format!("{}: {}", path.display(), e)))
    }

    /// Capability table in effect.
    pub fn capability_table(&self) -> CapabilityTable {
        self.capabilities.clone().unwrap_or_default()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Probe scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Time between probe rounds.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// A probe still pending after this long counts as an unhealthy check.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            timeout: Duration::from_secs(10),
        }
    }
}
