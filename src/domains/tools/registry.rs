//! Tool Registry - the static list of tools an adapter advertises.
//!
//! The registry is built once from a [`ToolSet`](super::ToolSet) at startup
//! and never changes afterwards. It is the single source of truth for both
//! `tools/list` and argument validation: every descriptor's input schema is
//! compiled here, so a schema that cannot be enforced fails startup.

use rmcp::model::Tool;
use tracing::debug;

use super::validation::ArgumentValidator;
use crate::core::error::{Error, Result};

/// Immutable, ordered collection of tool descriptors with unique names.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    validators: Vec<ArgumentValidator>,
}

impl ToolRegistry {
    /// Create a registry from tool descriptors, keeping their order.
    ///
    /// Fails if two descriptors share a name.
    pub fn new(tools: Vec<Tool>) -> Result<Self> {
        for (i, tool) in tools.iter().enumerate() {
            if tools[..i].iter().any(|t| t.name == tool.name) {
                return Err(Error::internal(format!(
                    "duplicate tool name in registry: {}",
                    tool.name
                )));
            }
        }

        let validators = tools
            .iter()
            .map(|tool| {
                ArgumentValidator::compile(&tool.input_schema)
                    .map_err(|e| Error::internal(format!("tool '{}': {e}", tool.name)))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Registered {} tool(s)", tools.len());
        Ok(Self { tools, validators })
    }

    /// All tool descriptors, in registration order.
    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Look up a descriptor by exact name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Compiled argument validator of the named tool.
    pub fn validator(&self, name: &str) -> Option<&ArgumentValidator> {
        let index = self.tools.iter().position(|t| t.name == name)?;
        self.validators.get(index)
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
