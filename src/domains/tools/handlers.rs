//! Tool handler seam and shared helpers.
//!
//! Each backing service provides one [`ToolSet`]: the descriptors it
//! advertises plus the routing from a tool name to the typed handler. The
//! helpers here turn validated argument maps into typed parameter structs and
//! handler output into `CallToolResult` values.

use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ToolError, ToolResult};

/// A backing service's tools.
///
/// Implementations hold the service client built from configuration and are
/// shared read-only for the lifetime of the process.
#[async_trait::async_trait]
pub trait ToolSet: Send + Sync {
    /// Human-readable usage notes returned from `initialize`.
    fn instructions(&self) -> &str;

    /// Descriptors of every tool in this set, in listing order.
    fn tools(&self) -> Vec<Tool>;

    /// Run the named tool with arguments that already passed schema validation.
    async fn execute(&self, name: &str, arguments: JsonObject) -> ToolResult<CallToolResult>;
}

/// Build a tool descriptor whose input schema is derived from `P`.
pub fn tool_descriptor<P: JsonSchema + 'static>(name: &'static str, description: &'static str) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: schema_for_type::<P>().into(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Deserialize validated arguments into the tool's parameter struct.
///
/// Optional fields take their declared defaults here.
pub fn parse_params<P: DeserializeOwned>(arguments: JsonObject) -> ToolResult<P> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_params(e.to_string()))
}

/// Create a success result with a single text item.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Create a success result holding `value` as pretty-printed JSON text.
pub fn json_result<T: Serialize>(value: &T) -> ToolResult<CallToolResult> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::internal(format!("Failed to serialize result: {e}")))?;
    Ok(text_result(text))
}

/// Text of the first content item, if it is text.
#[cfg(test)]
pub(crate) fn first_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}
