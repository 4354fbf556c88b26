//! Brave web search tool.
//!
//! Runs a single query against the Brave Search web endpoint and returns the
//! results as a compact JSON array of title, URL and description.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::client::ApiClient;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{json_result, text_result, tool_descriptor};

/// Text returned when the search produced no results.
pub const NO_RESULTS: &str = "No results found.";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the web search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BraveWebSearchParams {
    /// Search query.
    #[schemars(description = "Search query", length(min = 1))]
    pub query: String,

    /// Number of results (1-20, default 5).
    #[serde(default = "default_count")]
    #[schemars(description = "Number of results (1-20, default 5)", range(min = 1, max = 20))]
    pub count: u32,
}

fn default_count() -> u32 {
    5
}

// ============================================================================
// Brave API Response Structures
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct BraveSearchResponse {
    #[serde(default)]
    web: Option<BraveWebResults>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveWebResult>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

/// One reshaped search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub description: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Brave web search tool.
pub struct BraveWebSearchTool;

impl BraveWebSearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "brave_web_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search the web with the Brave Search API. \
         Use it for general queries, news, articles and recent events. \
         Returns up to 20 results, each with title, URL and description.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_descriptor::<BraveWebSearchParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Execute the search.
    #[instrument(skip_all, fields(query = %params.query, count = params.count))]
    pub async fn execute(params: &BraveWebSearchParams, client: &ApiClient) -> ToolResult<CallToolResult> {
        info!("Searching the web");

        let url = client.endpoint(std::iter::empty::<&str>())?;
        let count = params.count.to_string();
        let response: BraveSearchResponse = client
            .get_json(url, &[("q", params.query.as_str()), ("count", count.as_str())])
            .await?;

        let hits = reshape(response);
        info!("Found {} result(s)", hits.len());

        if hits.is_empty() {
            return Ok(text_result(NO_RESULTS));
        }
        json_result(&hits)
    }
}

fn reshape(response: BraveSearchResponse) -> Vec<SearchHit> {
    response
        .web
        .unwrap_or_default()
        .results
        .into_iter()
        .map(|r| SearchHit {
            title: r.title,
            url: r.url,
            description: r.description,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::client::Auth;
    use crate::domains::tools::error::ErrorKind;
    use crate::domains::tools::handlers::first_text;
    use mockito::Matcher;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(
            "Brave Search",
            url,
            Auth::Header("x-subscription-token", "test-key".to_string()),
            "Check BRAVE_API_KEY.",
        )
        .unwrap()
    }

    fn params(query: &str, count: u32) -> BraveWebSearchParams {
        BraveWebSearchParams {
            query: query.to_string(),
            count,
        }
    }

    #[test]
    fn test_params_default_count() {
        let params: BraveWebSearchParams = serde_json::from_str(r#"{"query": "rust"}"#).unwrap();
        assert_eq!(params.count, 5);
    }

    #[tokio::test]
    async fn test_search_results_reshaped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("x-subscription-token", "test-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "rust async".into()),
                Matcher::UrlEncoded("count".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "type": "search",
                    "web": {
                        "results": [
                            {"title": "Async Rust", "url": "https://rust-lang.github.io/async-book/", "description": "The <strong>async</strong> book", "age": "2 days"},
                            {"title": "Tokio", "url": "https://tokio.rs", "description": "An async runtime"}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let result = BraveWebSearchTool::execute(&params("rust async", 2), &client(&server.url()))
            .await
            .unwrap();

        let hits: Vec<SearchHit> = serde_json::from_str(first_text(&result)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0],
            SearchHit {
                title: "Async Rust".to_string(),
                url: "https://rust-lang.github.io/async-book/".to_string(),
                description: "The <strong>async</strong> book".to_string(),
            }
        );
        assert_eq!(hits[1].url, "https://tokio.rs");

        let raw: serde_json::Value = serde_json::from_str(first_text(&result)).unwrap();
        let keys: Vec<_> = raw[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_results_literal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"web": {"results": []}}"#)
            .create_async()
            .await;

        let result = BraveWebSearchTool::execute(&params("zzzz", 5), &client(&server.url()))
            .await
            .unwrap();
        assert_eq!(first_text(&result), "No results found.");
    }

    #[tokio::test]
    async fn test_missing_web_section_is_zero_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"type": "search", "query": {"original": "zzzz"}}"#)
            .create_async()
            .await;

        let result = BraveWebSearchTool::execute(&params("zzzz", 5), &client(&server.url()))
            .await
            .unwrap();
        assert_eq!(first_text(&result), NO_RESULTS);
    }

    #[tokio::test]
    async fn test_unauthorized_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"type": "ErrorResponse"}"#)
            .create_async()
            .await;

        let err = BraveWebSearchTool::execute(&params("rust", 5), &client(&server.url()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert!(err.to_string().contains("BRAVE_API_KEY"));
    }

    #[tokio::test]
    async fn test_rate_limited_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("Too many requests")
            .create_async()
            .await;

        let err = BraveWebSearchTool::execute(&params("rust", 5), &client(&server.url()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert_eq!(
            err.to_string(),
            "Brave Search API returned 429: Too many requests"
        );
    }
}
