//! Backend types: BackendStatus, BackendDescriptor, ToolCall.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque tool arguments.
pub type Arguments = serde_json::Map<String, Value>;

/// Backend lifecycle status as reported by the process supervisor.
///
/// ```text
/// STOPPED → STARTING → RUNNING
///     ↑         ↓         ↓
///     └────── ERROR ←─────┘
/// ```
///
/// The registry accepts any reported status; the supervisor owns the
/// transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Error,
}

impl BackendStatus {
    /// Only running backends accept tool calls.
    pub fn accepts_calls(self) -> bool {
        self == BackendStatus::Running
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendStatus::Stopped => "stopped",
            BackendStatus::Starting => "starting",
            BackendStatus::Running => "running",
            BackendStatus::Error => "error",
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured tool-providing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub status: BackendStatus,
}

impl BackendDescriptor {
    /// New descriptor in the `Stopped` state.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            status: BackendStatus::Stopped,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_status(mut self, status: BackendStatus) -> Self {
        self.status = status;
        self
    }
}

/// A tool invocation resolved to its backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub backend: String,
    pub tool: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl ToolCall {
    pub fn new(backend: impl Into<String>, tool: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            backend: backend.into(),
            tool: tool.into(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_stopped() {
        assert_eq!(BackendStatus::default(), BackendStatus::Stopped);
        assert_eq!(BackendDescriptor::new("fs", "npx").status, BackendStatus::Stopped);
    }

    #[test]
    fn test_only_running_accepts_calls() {
        assert!(BackendStatus::Running.accepts_calls());
        assert!(!BackendStatus::Stopped.accepts_calls());
        assert!(!BackendStatus::Starting.accepts_calls());
        assert!(!BackendStatus::Error.accepts_calls());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BackendStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        assert_eq!(BackendStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_descriptor_builder() {
        let desc = BackendDescriptor::new("git", "uvx")
            .with_args(["mcp-server-git", "--repository", "."])
            .with_env("GIT_TRACE", "0");
        assert_eq!(desc.args, vec!["mcp-server-git", "--repository", "."]);
        assert_eq!(desc.env.get("GIT_TRACE").map(String::as_str), Some("0"));
    }
}
