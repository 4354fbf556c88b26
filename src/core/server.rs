//! MCP Server implementation.
//!
//! This module contains the protocol handler that maps JSON-RPC methods onto
//! the tool dispatcher. It is transport-agnostic: a transport feeds it one
//! line at a time and writes back whatever response it returns.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/`, grouped per backing
//! service. The service's tool set is chosen in `domains/tools/catalog.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use std::sync::Arc;

use rmcp::model::{ErrorData as McpError, JsonObject};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::transport::jsonrpc::{JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse};
use crate::domains::tools::{Dispatcher, ToolSet};

/// MCP protocol revision announced in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The main MCP server handler.
///
/// Cheap to clone; all state is shared and read-only.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry plus tool set of this adapter.
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server serving `tools`.
    pub fn new(config: Config, tools: Arc<dyn ToolSet>) -> Result<Self> {
        let dispatcher = Dispatcher::new(tools)?;
        info!("Serving {} tool(s): {:?}", dispatcher.registry().len(), dispatcher.registry().tool_names());

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Handle one raw line from the transport.
    ///
    /// Returns `None` when nothing must be written back (notifications).
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparsable message: {}", e);
                return Some(JsonRpcResponse::parse_error(format!("Parse error: {e}")));
            }
        };

        let id = value.get("id").cloned();
        if !value.is_object() {
            return Some(JsonRpcResponse::invalid_request(None, "Request must be a JSON object"));
        }

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::invalid_request(id, format!("Invalid request: {e}"))),
        }
    }

    /// Handle a decoded JSON-RPC request.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::invalid_request(
                request.id,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
            ));
        }

        if request.method.is_empty() {
            return Some(JsonRpcResponse::invalid_request(request.id, "Missing method"));
        }

        if request.is_notification() || request.method.starts_with("notifications/") {
            handle_notification(&request);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id, &request.method)
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let client = request
            .params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!("Initializing session for client '{}'", client);

        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name(),
                "version": self.version()
            },
            "instructions": self.dispatcher.instructions()
        });

        JsonRpcResponse::success(request.id, result)
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Listing tools");
        JsonRpcResponse::success(request.id, json!({ "tools": self.dispatcher.list_tools() }))
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let (name, arguments) = match call_params(request.params) {
            Ok(parsed) => parsed,
            Err(msg) => return JsonRpcResponse::invalid_params(request.id, msg),
        };

        info!("Calling tool: {}", name);

        match self.dispatcher.invoke(&name, arguments).await {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(request.id, value),
                Err(e) => JsonRpcResponse::error(
                    request.id,
                    McpError::internal_error(format!("Failed to encode result: {e}"), None),
                ),
            },
            Err(e) => JsonRpcResponse::error(request.id, McpError::from(e)),
        }
    }
}

/// Extract the tool name and argument map from `tools/call` params.
///
/// Missing or `null` arguments mean an empty map.
fn call_params(params: Option<Value>) -> std::result::Result<(String, JsonObject), String> {
    let Some(Value::Object(mut params)) = params else {
        return Err("tools/call params must be an object".to_string());
    };

    let name = match params.remove("name") {
        Some(Value::String(name)) => name,
        _ => return Err("tools/call params must include a string 'name'".to_string()),
    };

    let arguments = match params.remove("arguments") {
        None | Some(Value::Null) => JsonObject::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(_) => return Err("tools/call 'arguments' must be an object".to_string()),
    };

    Ok((name, arguments))
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client sent initialized notification"),
        "notifications/cancelled" => debug!("Client cancelled a request"),
        method => debug!("Ignoring notification: {}", method),
    }
}
