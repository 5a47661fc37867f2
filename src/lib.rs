//! # MCP Conductor - tool routing and restart decisions for MCP server fleets
//!
//! Provides:
//! - A backend registry holding server descriptors and supervisor-reported status
//! - Tool-call routing with explicit mappings and capability-table inference
//! - Rolling per-backend health metrics fed by probe results
//! - A restart policy with a consecutive-failure threshold and cooldown window
//! - A workflow executor with per-step partial-failure records
//!
//! ## Architecture
//!
//! The `Orchestrator` owns all mutable state; callers share it behind one lock:
//! ```text
//!                     ┌─────────────────────────────────┐
//!   config loader  →  │          Orchestrator           │
//!   supervisor     →  │  ┌─────────┐ ┌─────────┐        │
//!   workflows      →  │  │ Backend │ │  Tool   │        │
//!                     │  │Registry │ │ Router  │        │
//!                     │  └─────────┘ └─────────┘        │
//!   prober ──────────→│  ┌─────────┐ ┌─────────┐        │──→ needs_restart
//!                     │  │ Health  │ │ Restart │        │
//!                     │  │ Tracker │ │ Policy  │        │
//!                     │  └─────────┘ └─────────┘        │
//!                     └─────────────────────────────────┘
//! ```
//!
//! Process control and the probe transport stay outside: the supervisor polls
//! restart decisions and reports status back; probers produce check results.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod backend;
pub mod clock;
pub mod health;
pub mod loader;
pub mod orchestrator;
pub mod routing;
pub mod types;
pub mod workflow;

// Internal utilities
pub mod observability;

pub use backend::{Arguments, BackendDescriptor, BackendRegistry, BackendStatus, ToolCall};
pub use health::{HealthCheckResult, HealthConfig, HealthTracker, RestartPolicy, RestartState};
pub use orchestrator::{Orchestrator, SharedOrchestrator};
pub use routing::{CapabilityTable, ToolRouter};
pub use types::{Config, Error, Result};
pub use workflow::{StepError, StepOutcome};
