//! List a directory of a GitHub repository.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::{ContentEntry, ContentsResponse, default_ref, fetch_contents};
use crate::domains::tools::client::ApiClient;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{json_result, tool_descriptor};

/// Parameters for listing a repository directory.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListDirectoryParams {
    #[schemars(description = "Repository owner (user or organization)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    /// Directory path; empty for the repository root.
    #[serde(default)]
    #[schemars(description = "Directory path inside the repository (default: repository root)")]
    pub path: String,

    #[serde(rename = "ref", default = "default_ref")]
    #[schemars(description = "Branch, tag or commit SHA (default: main)")]
    pub git_ref: String,
}

/// One directory entry as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub size: u64,
}

impl From<ContentEntry> for DirectoryEntry {
    fn from(entry: ContentEntry) -> Self {
        Self {
            name: entry.name,
            kind: entry.kind,
            path: entry.path,
            size: entry.size,
        }
    }
}

/// Repository directory listing tool.
pub struct ListDirectoryTool;

impl ListDirectoryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_directory";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List the entries of a directory in a GitHub repository. \
         Each entry has a name, type (file, dir, symlink or submodule), path and size.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_descriptor::<ListDirectoryParams>(Self::NAME, Self::DESCRIPTION)
    }

    #[instrument(skip_all, fields(owner = %params.owner, repo = %params.repo, path = %params.path, git_ref = %params.git_ref))]
    pub async fn execute(params: &ListDirectoryParams, client: &ApiClient) -> ToolResult<CallToolResult> {
        info!("Listing repository directory");

        let response = fetch_contents(client, &params.owner, &params.repo, &params.path, &params.git_ref).await?;

        let entries: Vec<DirectoryEntry> = match response {
            ContentsResponse::Listing(entries) => entries.into_iter().map(DirectoryEntry::from).collect(),
            ContentsResponse::Item(item) => {
                return Err(ToolError::internal(format!(
                    "Expected directory listing at '{}' but got '{}'",
                    params.path, item.kind
                )));
            }
        };

        info!("Listed {} entr(y/ies)", entries.len());
        json_result(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::client::Auth;
    use crate::domains::tools::error::ErrorKind;
    use crate::domains::tools::handlers::first_text;
    use mockito::Matcher;

    fn client(url: &str) -> ApiClient {
        ApiClient::new("GitHub", url, Auth::Bearer("ghp_test".into()), "Check GITHUB_PERSONAL_ACCESS_TOKEN.").unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let params: ListDirectoryParams = serde_json::from_str(r#"{"owner":"o","repo":"r"}"#).unwrap();
        assert_eq!(params.path, "");
        assert_eq!(params.git_ref, "main");
    }

    #[tokio::test]
    async fn test_root_listing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/hello/contents")
            .match_query(Matcher::UrlEncoded("ref".into(), "develop".into()))
            .with_status(200)
            .with_body(
                r#"[
                    {"name":"Cargo.toml","type":"file","path":"Cargo.toml","size":512,"sha":"a1","url":"x"},
                    {"name":"src","type":"dir","path":"src","size":0,"sha":"b2","url":"y"}
                ]"#,
            )
            .create_async()
            .await;

        let params = ListDirectoryParams {
            owner: "octo".into(),
            repo: "hello".into(),
            path: String::new(),
            git_ref: "develop".into(),
        };
        let result = ListDirectoryTool::execute(&params, &client(&server.url())).await.unwrap();

        let entries: Vec<DirectoryEntry> = serde_json::from_str(first_text(&result)).unwrap();
        assert_eq!(
            entries,
            vec![
                DirectoryEntry {
                    name: "Cargo.toml".into(),
                    kind: "file".into(),
                    path: "Cargo.toml".into(),
                    size: 512,
                },
                DirectoryEntry {
                    name: "src".into(),
                    kind: "dir".into(),
                    path: "src".into(),
                    size: 0,
                },
            ]
        );

        let raw: serde_json::Value = serde_json::from_str(first_text(&result)).unwrap();
        assert_eq!(raw[1]["type"], "dir");
        assert!(raw[0].get("sha").is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_directory_is_empty_array() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/hello/contents/empty")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let params = ListDirectoryParams {
            owner: "octo".into(),
            repo: "hello".into(),
            path: "empty".into(),
            git_ref: "main".into(),
        };
        let result = ListDirectoryTool::execute(&params, &client(&server.url())).await.unwrap();
        assert_eq!(first_text(&result), "[]");
    }

    #[tokio::test]
    async fn test_file_path_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/hello/contents/README.md")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"type":"file","name":"README.md","path":"README.md","size":5,"encoding":"base64","content":"aGVsbG8="}"#)
            .create_async()
            .await;

        let params = ListDirectoryParams {
            owner: "octo".into(),
            repo: "hello".into(),
            path: "README.md".into(),
            git_ref: "main".into(),
        };
        let err = ListDirectoryTool::execute(&params, &client(&server.url())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert!(err.to_string().contains("Expected directory listing"));
    }

    #[tokio::test]
    async fn test_unauthorized_names_token_variable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/private/contents")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let params = ListDirectoryParams {
            owner: "octo".into(),
            repo: "private".into(),
            path: String::new(),
            git_ref: "main".into(),
        };
        let err = ListDirectoryTool::execute(&params, &client(&server.url())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert!(err.to_string().contains("GITHUB_PERSONAL_ACCESS_TOKEN"));
    }
}
