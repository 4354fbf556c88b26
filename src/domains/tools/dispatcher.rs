//! Tool invocation dispatch.
//!
//! The dispatcher owns the registry and the service's [`ToolSet`]. An
//! invocation is resolved against the registry, its arguments are validated
//! against the registered schema, and only then is the handler run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{error, info, instrument, warn};

use super::error::{ToolError, ToolResult};
use super::handlers::ToolSet;
use super::registry::ToolRegistry;
use crate::core::error::Result;

/// Routes invocations to the tool set after name and argument checks.
pub struct Dispatcher {
    registry: ToolRegistry,
    tools: Arc<dyn ToolSet>,
}

impl Dispatcher {
    /// Build a dispatcher, registering every tool the set advertises.
    pub fn new(tools: Arc<dyn ToolSet>) -> Result<Self> {
        let registry = ToolRegistry::new(tools.tools())?;
        Ok(Self { registry, tools })
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Usage notes of the underlying tool set.
    pub fn instructions(&self) -> &str {
        self.tools.instructions()
    }

    /// List all tool descriptors, in registry order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools().to_vec()
    }

    /// Invoke a tool by name.
    ///
    /// Unknown names fail with `MethodNotFound` and invalid arguments with
    /// `InvalidParams`, both before the handler runs. Handler errors are
    /// returned as they are; a panicking handler becomes `Internal`.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: JsonObject) -> ToolResult<CallToolResult> {
        let Some(validator) = self.registry.validator(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::method_not_found(name));
        };

        if let Err(e) = validator.validate(&arguments) {
            warn!("Rejected arguments: {}", e);
            return Err(e);
        }

        let outcome = AssertUnwindSafe(self.tools.execute(name, arguments))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ToolError::internal(format!("Tool '{name}' panicked"))));

        match &outcome {
            Ok(_) => info!("Tool completed"),
            Err(e) => error!(kind = ?e.kind(), "Tool failed: {}", e),
        }

        outcome
    }
}
