//! Search code across GitHub repositories.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::client::ApiClient;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{json_result, tool_descriptor};

/// Parameters for code search.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchCodeParams {
    #[schemars(description = "Code search query", length(min = 1))]
    pub query: String,

    #[serde(default)]
    #[schemars(description = "Restrict results to this language (e.g. rust)")]
    pub language: Option<String>,

    #[serde(default)]
    #[schemars(description = "Restrict results to repositories of this user or organization")]
    pub owner: Option<String>,

    /// Only meaningful together with `owner`.
    #[serde(default)]
    #[schemars(description = "Restrict results to this repository (requires owner)")]
    pub repo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<CodeSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CodeSearchItem {
    path: String,
    html_url: String,
    repository: CodeSearchRepository,
}

#[derive(Debug, Deserialize)]
struct CodeSearchRepository {
    full_name: String,
}

/// One code search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMatch {
    pub repository: String,
    pub path: String,
    pub url: String,
}

/// Compose the search string with GitHub qualifiers.
///
/// `repo` narrows to `repo:owner/repo`; `owner` alone narrows to `user:owner`.
pub fn build_query(params: &SearchCodeParams) -> ToolResult<String> {
    let mut query = params.query.clone();

    if let Some(language) = non_empty(&params.language) {
        query.push_str(&format!(" language:{language}"));
    }

    match (non_empty(&params.owner), non_empty(&params.repo)) {
        (Some(owner), Some(repo)) => query.push_str(&format!(" repo:{owner}/{repo}")),
        (Some(owner), None) => query.push_str(&format!(" user:{owner}")),
        (None, Some(_)) => {
            return Err(ToolError::invalid_params(
                "parameter 'repo' requires 'owner' to be set",
            ));
        }
        (None, None) => {}
    }

    Ok(query)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// GitHub code search tool.
pub struct SearchCodeTool;

impl SearchCodeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_code";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for code on GitHub. \
         Optionally narrow by language, by owner, or by owner and repository. \
         Returns matches with repository, file path and URL.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_descriptor::<SearchCodeParams>(Self::NAME, Self::DESCRIPTION)
    }

    #[instrument(skip_all, fields(query = %params.query))]
    pub async fn execute(params: &SearchCodeParams, client: &ApiClient) -> ToolResult<CallToolResult> {
        let query = build_query(params)?;
        info!(q = %query, "Searching code");

        let url = client.endpoint(["search", "code"])?;
        let response: CodeSearchResponse = client.get_json(url, &[("q", query.as_str())]).await?;

        info!(
            "Found {} match(es), returning {}",
            response.total_count,
            response.items.len()
        );

        let matches: Vec<CodeMatch> = response
            .items
            .into_iter()
            .map(|item| CodeMatch {
                repository: item.repository.full_name,
                path: item.path,
                url: item.html_url,
            })
            .collect();

        json_result(&matches)
    }
}
