//! Fetch a GitLab merge request together with its diffs.
//!
//! The merge request is fetched first, then every page of its diffs. Any
//! request failing fails the whole call; no partial result is returned.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::client::{ApiClient, Page};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{json_result, tool_descriptor};

/// Largest page size the diffs endpoint accepts.
const DIFFS_PER_PAGE: &str = "100";

/// Parameters for fetching a merge request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMergeRequestParams {
    /// Numeric id or URL path such as `group/project`.
    #[schemars(description = "Project ID or path (e.g. 'group/project')", length(min = 1))]
    pub project_id: String,

    #[schemars(description = "Merge request IID (the number shown in the UI)", range(min = 1))]
    pub merge_request_iid: u64,
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequest {
    id: u64,
    iid: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    source_branch: String,
    #[serde(default)]
    target_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitLabDiff {
    #[serde(default)]
    old_path: String,
    #[serde(default)]
    new_path: String,
    #[serde(default)]
    diff: String,
}

/// One changed file of a merge request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    pub old_path: String,
    pub new_path: String,
    pub diff: String,
}

/// Merge request summary with its changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequestSummary {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    pub description: String,
    pub state: String,
    pub source_branch: String,
    pub target_branch: String,
    pub changes: Vec<FileChange>,
}

/// GitLab merge request tool.
pub struct GetMergeRequestTool;

impl GetMergeRequestTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_merge_request";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get a GitLab merge request with its title, description, \
         state, branches and the diff of every changed file.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_descriptor::<GetMergeRequestParams>(Self::NAME, Self::DESCRIPTION)
    }

    #[instrument(skip_all, fields(project_id = %params.project_id, iid = params.merge_request_iid))]
    pub async fn execute(params: &GetMergeRequestParams, client: &ApiClient) -> ToolResult<CallToolResult> {
        info!("Fetching merge request");

        let iid = params.merge_request_iid.to_string();
        let base = ["projects", params.project_id.as_str(), "merge_requests", iid.as_str()];

        let merge_request: GitLabMergeRequest = client.get_json(client.endpoint(base)?, &[]).await?;

        let diffs_url = client.endpoint(base.into_iter().chain(["diffs"]))?;
        let mut diffs: Vec<GitLabDiff> = Vec::new();
        let mut page = "1".to_string();
        loop {
            let query = [("per_page", DIFFS_PER_PAGE), ("page", page.as_str())];
            let batch: Page<Vec<GitLabDiff>> = client.get_page(diffs_url.clone(), &query).await?;
            diffs.extend(batch.body);
            match batch.next_page {
                Some(next) if next != page => page = next,
                _ => break,
            }
        }

        info!("Merge request has {} changed file(s)", diffs.len());

        let summary = MergeRequestSummary {
            id: merge_request.id,
            iid: merge_request.iid,
            title: merge_request.title,
            description: merge_request.description.unwrap_or_default(),
            state: merge_request.state,
            source_branch: merge_request.source_branch,
            target_branch: merge_request.target_branch,
            changes: diffs
                .into_iter()
                .map(|d| FileChange {
                    old_path: d.old_path,
                    new_path: d.new_path,
                    diff: d.diff,
                })
                .collect(),
        };

        json_result(&summary)
    }
}
