//! MCP API adapters
//!
//! This crate exposes third-party web APIs as Model Context Protocol tools.
//! Each adapter runs as its own process, speaks line-delimited JSON-RPC 2.0
//! on stdin/stdout and serves the tools of one backing service:
//!
//! - `brave-search-mcp`: `brave_web_search`
//! - `github-mcp`: `get_file_contents`, `search_code`, `list_directory`
//! - `gitlab-mcp`: `get_merge_request`
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the protocol handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: registry, dispatcher, argument validation and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_api_adapters::core::{AdapterKind, app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     app::run(AdapterKind::GitHub).await
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{AdapterKind, Config, Error, McpServer, Result};
