//! GitLab tools.
//!
//! - `merge_request`: a merge request with its per-file diffs

pub mod merge_request;

pub use merge_request::{FileChange, GetMergeRequestParams, GetMergeRequestTool, MergeRequestSummary};

use rmcp::model::{CallToolResult, JsonObject, Tool};

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::domains::tools::client::{ApiClient, Auth};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolSet, parse_params};

const SERVICE: &str = "GitLab";

const CREDENTIAL_HINT: &str = "Check GITLAB_PERSONAL_ACCESS_TOKEN; tokens with the read_api scope \
     are created under User Settings > Access Tokens on your GitLab instance";

/// Tool set backed by the GitLab REST API.
pub struct GitLabTools {
    client: ApiClient,
}

impl GitLabTools {
    /// Build the tool set from configuration.
    ///
    /// Uses `GITLAB_API_URL` when set, for self-hosted instances.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.require_credential()?;
        let client = ApiClient::new(
            SERVICE,
            &config.endpoints.gitlab_api_url,
            Auth::Header("private-token", token.to_string()),
            CREDENTIAL_HINT,
        )
        .map_err(|e| Error::config(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ToolSet for GitLabTools {
    fn instructions(&self) -> &str {
        "GitLab merge request access. Call get_merge_request with a project id or path \
         (group/project) and the merge request IID."
    }

    fn tools(&self) -> Vec<Tool> {
        vec![GetMergeRequestTool::to_tool()]
    }

    async fn execute(&self, name: &str, arguments: JsonObject) -> ToolResult<CallToolResult> {
        match name {
            GetMergeRequestTool::NAME => {
                GetMergeRequestTool::execute(&parse_params(arguments)?, &self.client).await
            }
            _ => Err(ToolError::method_not_found(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AdapterKind;
    use crate::domains::tools::dispatcher::Dispatcher;
    use crate::domains::tools::error::ErrorKind;
    use std::sync::Arc;

    fn tools(url: &str) -> GitLabTools {
        GitLabTools::new(
            ApiClient::new(SERVICE, url, Auth::Header("private-token", "t".into()), CREDENTIAL_HINT).unwrap(),
        )
    }

    #[test]
    fn test_invalid_gitlab_url_is_config_error() {
        let mut config = Config::new(AdapterKind::GitLab);
        config.credentials.gitlab_token = Some("glpat-x".into());
        config.endpoints.gitlab_api_url = "not a url".into();
        let err = GitLabTools::from_config(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_iid_below_one_rejected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(Arc::new(tools(&server.url()))).unwrap();
        let arguments = serde_json::json!({ "project_id": "7", "merge_request_iid": 0 })
            .as_object()
            .cloned()
            .unwrap();
        let err = dispatcher.invoke("get_merge_request", arguments).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParams);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_string_iid_rejected() {
        let dispatcher = Dispatcher::new(Arc::new(tools("http://127.0.0.1:9"))).unwrap();
        let arguments = serde_json::json!({ "project_id": "7", "merge_request_iid": "42" })
            .as_object()
            .cloned()
            .unwrap();
        let err = dispatcher.invoke("get_merge_request", arguments).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParams);
    }
}
