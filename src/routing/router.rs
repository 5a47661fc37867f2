//! Tool router — resolves a tool name to the backend that serves it.
//!
//! Resolution order:
//! 1. explicit `register_tool` mapping
//! 2. first capability-table category that claims the tool and is a
//!    registered backend
//! 3. `UnroutableTool`
//!
//! The router never mutates the registry; it borrows it per call.

use std::collections::HashMap;

use super::capability::CapabilityTable;
use crate::backend::{Arguments, BackendRegistry, ToolCall};
use crate::types::{Error, Result};

#[derive(Debug, Default)]
pub struct ToolRouter {
    /// tool name → backend name
    explicit: HashMap<String, String>,
    capabilities: CapabilityTable,
}

impl ToolRouter {
    pub fn new(capabilities: CapabilityTable) -> Self {
        Self {
            explicit: HashMap::new(),
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Swap the capability table. Explicit mappings are kept.
    pub fn set_capabilities(&mut self, capabilities: CapabilityTable) {
        self.capabilities = capabilities;
    }

    /// Map a tool to its providing backend. Last registration wins.
    pub fn register_tool(
        &mut self,
        registry: &BackendRegistry,
        tool: &str,
        backend: &str,
    ) -> Result<()> {
        if !registry.contains(backend) {
            return Err(Error::unknown_backend(backend));
        }
        if let Some(previous) = self.explicit.insert(tool.to_string(), backend.to_string()) {
            if previous != backend {
                tracing::debug!(tool = %tool, from = %previous, to = %backend, "tool mapping replaced");
            }
        }
        Ok(())
    }

    pub fn unregister_tool(&mut self, tool: &str) -> Option<String> {
        self.explicit.remove(tool)
    }

    /// Explicitly register every capability-table tool whose category is a
    /// registered backend. Existing explicit mappings are left alone.
    ///
    /// Returns the number of mappings added.
    pub fn register_capabilities(&mut self, registry: &BackendRegistry) -> usize {
        let mut added = 0;
        for category in self.capabilities.categories() {
            if !registry.contains(&category.name) {
                continue;
            }
            for tool in &category.tools {
                if !self.explicit.contains_key(tool) {
                    self.explicit.insert(tool.clone(), category.name.clone());
                    added += 1;
                }
            }
        }
        tracing::info!(added, total = self.explicit.len(), "capability tools registered");
        added
    }

    /// Drop every mapping that targets `backend`. Returns the number removed.
    pub fn forget_backend(&mut self, backend: &str) -> usize {
        let before = self.explicit.len();
        self.explicit.retain(|_, target| target != backend);
        before - self.explicit.len()
    }

    /// Backend name responsible for `tool`.
    pub fn resolve(&self, registry: &BackendRegistry, tool: &str) -> Result<String> {
        if let Some(backend) = self.explicit.get(tool) {
            return Ok(backend.clone());
        }

        self.capabilities
            .categories_for(tool)
            .find(|category| registry.contains(category))
            .map(str::to_string)
            .ok_or_else(|| Error::unroutable_tool(tool))
    }

    /// Resolve `tool` and package the invocation.
    pub fn route(
        &self,
        registry: &BackendRegistry,
        tool: &str,
        arguments: Arguments,
    ) -> Result<ToolCall> {
        let backend = self.resolve(registry, tool)?;
        tracing::debug!(tool = %tool, backend = %backend, "tool routed");
        Ok(ToolCall::new(backend, tool, arguments))
    }

    /// Explicit mappings as (tool, backend), sorted by tool.
    pub fn registered_tools(&self) -> Vec<(String, String)> {
        let mut tools: Vec<(String, String)> = self
            .explicit
            .iter()
            .map(|(t, b)| (t.clone(), b.clone()))
            .collect();
        tools.sort();
        tools
    }

    pub fn tool_count(&self) -> usize {
        self.explicit.len()
    }
}
