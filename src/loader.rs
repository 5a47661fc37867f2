//! MCP settings file loading and linting.
//!
//! Reads the `mcpServers` object of an MCP client settings file:
//!
//! ```json
//! { "mcpServers": { "git": { "command": "uvx", "args": ["mcp-server-git"], "env": {} } } }
//! ```
//!
//! `load_servers` only checks shape. `lint_servers` reports the common
//! hand-editing mistakes and nothing more.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::backend::BackendDescriptor;
use crate::types::{Error, Result};

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(rename = "mcpServers", default)]
    mcp_servers: BTreeMap<String, ServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    #[serde(default)]
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
}

/// Parse server definitions from settings JSON text.
pub fn parse_servers(raw: &str) -> Result<Vec<BackendDescriptor>> {
    decode(raw).map_err(|e| Error::invalid_config(e.to_string()))
}

fn decode(raw: &str) -> serde_json::Result<Vec<BackendDescriptor>> {
    let settings: SettingsFile = serde_json::from_str(raw)?;

    Ok(settings
        .mcp_servers
        .into_iter()
        .map(|(name, entry)| BackendDescriptor {
            name,
            command: entry.command,
            args: entry.args,
            env: entry.env,
            status: Default::default(),
        })
        .collect())
}

/// Load server definitions from a settings file, sorted by name.
pub fn load_servers(path: impl AsRef<Path>) -> Result<Vec<BackendDescriptor>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }
    let raw = std::fs::read_to_string(path)?;
    let servers = decode(&raw)
        .map_err(|e| Error::invalid_config(format!("{}: {}", path.display(), e)))?;

    for server in &servers {
        tracing::info!(backend = %server.name, command = %server.command, "loaded server");
    }
    Ok(servers)
}

/// Key used for file-level issues in lint output.
pub const FILE_ISSUE_KEY: &str = "config";

/// Check a settings file for common mistakes.
///
/// Returns server name → issue; file-level problems use [`FILE_ISSUE_KEY`].
/// An empty map means no issues.
pub fn lint_servers(path: impl AsRef<Path>) -> BTreeMap<String, String> {
    let path = path.as_ref();
    if !path.exists() {
        return file_issue(format!("File not found: {}", path.display()));
    }
    match std::fs::read_to_string(path) {
        Ok(raw) => lint_servers_str(&raw),
        Err(e) => file_issue(format!("Unreadable: {}", e)),
    }
}

/// Lint settings JSON text.
pub fn lint_servers_str(raw: &str) -> BTreeMap<String, String> {
    let config: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return file_issue(format!("Invalid JSON: {}", e)),
    };

    let servers = match config.get("mcpServers").and_then(Value::as_object) {
        Some(servers) if !servers.is_empty() => servers,
        _ => return file_issue("No mcpServers defined".to_string()),
    };

    let mut issues = BTreeMap::new();
    for (name, server) in servers {
        let Some(command) = server.get("command") else {
            issues.insert(name.clone(), "Missing 'command' field".to_string());
            continue;
        };

        let args: &[Value] = server
            .get("args")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if let Some(cmd @ ("npx" | "uvx")) = command.as_str() {
            if args.is_empty() {
                issues.insert(
                    name.clone(),
                    format!("No args for {} - missing package name", cmd),
                );
            }
        }

        // Later findings overwrite earlier ones for the same server
        if let Some(arg) = args
            .iter()
            .filter_map(Value::as_str)
            .find(|a| a.contains('\\') && !a.contains("\\\\"))
        {
            issues.insert(name.clone(), format!("Single backslash in path: {}", arg));
        }
    }
    issues
}

fn file_issue(issue: String) -> BTreeMap<String, String> {
    BTreeMap::from([(FILE_ISSUE_KEY.to_string(), issue)])
}
