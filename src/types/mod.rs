//! Core types for the orchestrator.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for observability, health and probing

mod config;
mod errors;

pub use config::{Config, ObservabilityConfig, ProbeConfig};
pub use errors::{Error, Result};
