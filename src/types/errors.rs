//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Workflow-step failures are deliberately
//! absent here: they are recorded per step, see [`crate::workflow::StepError`].

use std::path::PathBuf;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the orchestrator.
#[derive(Error, Debug)]
pub enum Error {
    /// Server settings file does not exist.
    #[error("config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Server settings file exists but cannot be used.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Registration or status update against a backend that is not registered.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// No explicit mapping and no capability match for a tool.
    #[error("cannot route tool: {0}")]
    UnroutableTool(String),

    /// Lookup miss.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input supplied by a caller.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound(path.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn unknown_backend(name: impl Into<String>) -> Self {
        Self::UnknownBackend(name.into())
    }

    pub fn unroutable_tool(tool: impl Into<String>) -> Self {
        Self::UnroutableTool(tool.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Routing failures point at a configuration problem and must reach the caller.
    pub fn is_routing_error(&self) -> bool {
        matches!(self, Error::UnknownBackend(_) | Error::UnroutableTool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        assert_eq!(
            Error::unknown_backend("git").to_string(),
            "unknown backend: git"
        );
        assert_eq!(
            Error::unroutable_tool("teleport").to_string(),
            "cannot route tool: teleport"
        );
        assert_eq!(
            Error::config_not_found("/nope/settings.json").to_string(),
            "config not found: /nope/settings.json"
        );
    }

    #[test]
    fn test_routing_error_classification() {
        assert!(Error::unknown_backend("fs").is_routing_error());
        assert!(Error::unroutable_tool("x").is_routing_error());
        assert!(!Error::validation("bad").is_routing_error());
        assert!(!Error::not_found("fs").is_routing_error());
    }

    #[test]
    fn test_serde_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
