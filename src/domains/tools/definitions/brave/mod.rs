//! Brave Search tools.
//!
//! - `web_search`: general web search via the Brave Search API

pub mod web_search;

pub use web_search::{BraveWebSearchParams, BraveWebSearchTool};

use rmcp::model::{CallToolResult, JsonObject, Tool};

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::domains::tools::client::{ApiClient, Auth};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolSet, parse_params};

const SERVICE: &str = "Brave Search";

const CREDENTIAL_HINT: &str =
    "Check BRAVE_API_KEY; API keys are issued at https://brave.com/search/api/";

/// Tool set backed by the Brave Search API.
pub struct BraveSearchTools {
    client: ApiClient,
}

impl BraveSearchTools {
    /// Build the tool set from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_credential()?;
        let client = ApiClient::new(
            SERVICE,
            &config.endpoints.brave_search_url,
            Auth::Header("x-subscription-token", api_key.to_string()),
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
impl ToolSet for BraveSearchTools {
    fn instructions(&self) -> &str {
        "Web search backed by the Brave Search API. Call brave_web_search with a query \
         and an optional result count between 1 and 20."
    }

    fn tools(&self) -> Vec<Tool> {
        vec![BraveWebSearchTool::to_tool()]
    }

    async fn execute(&self, name: &str, arguments: JsonObject) -> ToolResult<CallToolResult> {
        match name {
            BraveWebSearchTool::NAME => {
                BraveWebSearchTool::execute(&parse_params(arguments)?, &self.client).await
            }
            _ => Err(ToolError::method_not_found(name)),
        }
    }
}
