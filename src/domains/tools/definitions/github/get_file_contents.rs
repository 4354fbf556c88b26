//! Read a single file from a GitHub repository.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{ContentItem, ContentsResponse, default_ref, fetch_contents};
use crate::domains::tools::client::ApiClient;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{text_result, tool_descriptor};

/// Parameters for reading a repository file.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFileContentsParams {
    #[schemars(description = "Repository owner (user or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Path to the file inside the repository")]
    pub path: String,

    /// Git reference to read from.
    #[serde(rename = "ref", default = "default_ref")]
    #[schemars(description = "Branch, tag or commit SHA (default: main)")]
    pub git_ref: String,
}

/// Repository file reader.
pub struct GetFileContentsTool;

impl GetFileContentsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_file_contents";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Read the contents of a file in a GitHub repository. \
         Returns the file as UTF-8 text.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_descriptor::<GetFileContentsParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(owner = %params.owner, repo = %params.repo, path = %params.path, git_ref = %params.git_ref))]
    pub async fn execute(params: &GetFileContentsParams, client: &ApiClient) -> ToolResult<CallToolResult> {
        info!("Reading repository file");

        let response = fetch_contents(client, &params.owner, &params.repo, &params.path, &params.git_ref).await?;

        match response {
            ContentsResponse::Item(item) => Ok(text_result(decode_file(&item)?)),
            ContentsResponse::Listing(_) => Err(ToolError::internal(format!(
                "Expected a file at '{}' but got a directory listing",
                params.path
            ))),
        }
    }
}

/// Decode the transport encoding of a file item to UTF-8 text.
fn decode_file(item: &ContentItem) -> ToolResult<String> {
    if item.kind != "file" {
        return Err(ToolError::internal(format!(
            "Expected a file at '{}' but got '{}'",
            item.path, item.kind
        )));
    }

    let Some(content) = item.content.as_deref() else {
        return Err(ToolError::internal(format!("No content returned for '{}'", item.path)));
    };

    match item.encoding.as_deref() {
        Some("base64") => {}
        other => {
            return Err(ToolError::internal(format!(
                "Unsupported content encoding for '{}': {}",
                item.path,
                other.unwrap_or("none")
            )));
        }
    }

    // GitHub wraps base64 payloads at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ToolError::internal(format!("Invalid base64 content for '{}': {e}", item.path)))?;

    String::from_utf8(bytes)
        .map_err(|e| ToolError::internal(format!("File '{}' is not valid UTF-8: {e}", item.path)))
}
