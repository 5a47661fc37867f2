//! Workflow executor — validates a sequence of routed tool calls.
//!
//! Steps run strictly in order and each produces exactly one outcome. A failed
//! step is recorded, never raised, so later independent steps still run.
//! Dispatch to the backend and retries belong to other collaborators.

use serde::Serialize;
use thiserror::Error;

use crate::backend::{Arguments, BackendRegistry, BackendStatus, ToolCall};

/// Why a step was not executed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepError {
    #[error("backend not found: {backend}")]
    BackendNotFound { backend: String },

    #[error("backend not running: {backend} ({status})")]
    BackendNotRunning {
        backend: String,
        status: BackendStatus,
    },
}

/// Result record for one workflow step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Executed {
        backend: String,
        tool: String,
        arguments: Arguments,
    },
    Failed {
        backend: String,
        tool: String,
        error: StepError,
    },
}

impl StepOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, StepOutcome::Executed { .. })
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            StepOutcome::Failed { error, .. } => Some(error),
            StepOutcome::Executed { .. } => None,
        }
    }
}

/// Validate one step against the registry.
pub fn execute_step(registry: &BackendRegistry, step: &ToolCall) -> StepOutcome {
    let failed = |error: StepError| StepOutcome::Failed {
        backend: step.backend.clone(),
        tool: step.tool.clone(),
        error,
    };

    match registry.status(&step.backend) {
        None => failed(StepError::BackendNotFound {
            backend: step.backend.clone(),
        }),
        Some(status) if !status.accepts_calls() => failed(StepError::BackendNotRunning {
            backend: step.backend.clone(),
            status,
        }),
        Some(_) => StepOutcome::Executed {
            backend: step.backend.clone(),
            tool: step.tool.clone(),
            arguments: step.arguments.clone(),
        },
    }
}

/// Run every step in order, one outcome per step.
pub fn execute(registry: &BackendRegistry, steps: &[ToolCall]) -> Vec<StepOutcome> {
    let outcomes: Vec<StepOutcome> = steps.iter().map(|s| execute_step(registry, s)).collect();

    let failed = outcomes.iter().filter(|o| !o.is_executed()).count();
    if failed > 0 {
        tracing::info!(steps = outcomes.len(), failed, "workflow finished with failed steps");
    } else {
        tracing::debug!(steps = outcomes.len(), "workflow finished");
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendDescriptor;
    use serde_json::json;

    fn registry() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(BackendDescriptor::new("fs", "npx").with_status(BackendStatus::Running));
        registry.register(BackendDescriptor::new("git", "uvx"));
        registry
    }

    fn call(backend: &str, tool: &str) -> ToolCall {
        let args = json!({"path": "README.md"}).as_object().cloned().unwrap();
        ToolCall::new(backend, tool, args)
    }

    #[test]
    fn test_running_backend_executes() {
        let outcome = execute_step(&registry(), &call("fs", "read_file"));
        match outcome {
            StepOutcome::Executed {
                backend,
                tool,
                arguments,
            } => {
                assert_eq!(backend, "fs");
                assert_eq!(tool, "read_file");
                assert_eq!(arguments["path"], "README.md");
            }
            other => panic!("expected executed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_backend() {
        let outcome = execute_step(&registry(), &call("ghost", "boo"));
        assert_eq!(
            outcome.error(),
            Some(&StepError::BackendNotFound {
                backend: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_every_non_running_status_rejected() {
        let mut registry = registry();
        for status in [
            BackendStatus::Stopped,
            BackendStatus::Starting,
            BackendStatus::Error,
        ] {
            registry.set_status("git", status).unwrap();
            let outcome = execute_step(&registry, &call("git", "git_log"));
            assert_eq!(
                outcome.error(),
                Some(&StepError::BackendNotRunning {
                    backend: "git".to_string(),
                    status
                })
            );
        }
    }

    #[test]
    fn test_partial_failure_keeps_order() {
        let steps = vec![
            call("git", "git_status"),
            call("fs", "read_file"),
            call("ghost", "x"),
            call("fs", "list_directory"),
        ];
        let outcomes = execute(&registry(), &steps);
        assert_eq!(outcomes.len(), 4);
        assert!(!outcomes[0].is_executed());
        assert!(outcomes[1].is_executed());
        assert!(matches!(
            outcomes[2].error(),
            Some(StepError::BackendNotFound { .. })
        ));
        assert!(outcomes[3].is_executed());
    }

    #[test]
    fn test_empty_workflow() {
        assert!(execute(&registry(), &[]).is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcomes = execute(&registry(), &[call("git", "git_log")]);
        let json = serde_json::to_value(&outcomes[0]).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "backend_not_running");
        assert_eq!(json["error"]["status"], "stopped");
    }
}
