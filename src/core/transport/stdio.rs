//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! stdout carries protocol messages only; logs go to stderr.

use std::future::Future;

use tokio::io::BufReader;
use tracing::info;

use super::TransportResult;
use super::session::{SessionEnd, serve_lines};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin closes or `shutdown` completes.
    pub async fn run<F>(server: McpServer, shutdown: F) -> TransportResult<()>
    where
        F: Future<Output = ()>,
    {
        info!("Ready - communicating via stdin/stdout");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        match serve_lines(&server, stdin, stdout, shutdown).await? {
            SessionEnd::Eof => info!("STDIO transport finished: input closed"),
            SessionEnd::Shutdown => info!("STDIO transport finished: shutdown requested"),
        }
        Ok(())
    }
}
