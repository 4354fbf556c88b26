//! GitHub repository tools.
//!
//! - `get_file_contents`: read a file as UTF-8 text
//! - `search_code`: code search with language/owner/repo qualifiers
//! - `list_directory`: list a directory

pub mod common;
pub mod get_file_contents;
pub mod list_directory;
pub mod search_code;

pub use get_file_contents::{GetFileContentsParams, GetFileContentsTool};
pub use list_directory::{DirectoryEntry, ListDirectoryParams, ListDirectoryTool};
pub use search_code::{CodeMatch, SearchCodeParams, SearchCodeTool};

use rmcp::model::{CallToolResult, JsonObject, Tool};

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::domains::tools::client::{ApiClient, Auth};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolSet, parse_params};

const SERVICE: &str = "GitHub";

const CREDENTIAL_HINT: &str = "Check GITHUB_PERSONAL_ACCESS_TOKEN; tokens are created at \
     https://github.com/settings/tokens";

/// Tool set backed by the GitHub REST API.
pub struct GitHubTools {
    client: ApiClient,
}

impl GitHubTools {
    /// Build the tool set from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.require_credential()?;
        let client = ApiClient::new(
            SERVICE,
            &config.endpoints.github_api_url,
            Auth::Bearer(token.to_string()),
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
impl ToolSet for GitHubTools {
    fn instructions(&self) -> &str {
        "GitHub repository access. Use get_file_contents to read a file, list_directory \
         to browse a directory (empty path for the root) and search_code to find code \
         across repositories."
    }

    fn tools(&self) -> Vec<Tool> {
        vec![
            GetFileContentsTool::to_tool(),
            SearchCodeTool::to_tool(),
            ListDirectoryTool::to_tool(),
        ]
    }

    async fn execute(&self, name: &str, arguments: JsonObject) -> ToolResult<CallToolResult> {
        match name {
            GetFileContentsTool::NAME => {
                GetFileContentsTool::execute(&parse_params(arguments)?, &self.client).await
            }
            SearchCodeTool::NAME => SearchCodeTool::execute(&parse_params(arguments)?, &self.client).await,
            ListDirectoryTool::NAME => {
                ListDirectoryTool::execute(&parse_params(arguments)?, &self.client).await
            }
            _ => Err(ToolError::method_not_found(name)),
        }
    }
}
