//! TCP transport implementation.
//!
//! Raw TCP socket transport with line-delimited JSON-RPC messages. One
//! connection is served at a time; the next is accepted once the current
//! peer disconnects.

use std::future::Future;

use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::session::{SessionEnd, serve_lines};
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind the listener.
    pub async fn bind(&self) -> TransportResult<TcpListener> {
        let addr = self.address();
        TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))
    }

    /// Run the TCP transport until `shutdown` completes.
    pub async fn run<F>(self, server: McpServer, shutdown: F) -> TransportResult<()>
    where
        F: Future<Output = ()>,
    {
        let listener = self.bind().await?;
        info!("Ready - listening on {} (JSON-RPC over TCP)", self.address());
        Self::serve(listener, server, shutdown).await
    }

    /// Accept and serve connections one after another on `listener`.
    pub async fn serve<F>(listener: TcpListener, server: McpServer, shutdown: F) -> TransportResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer_addr) = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, closing listener");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        // Small delay to avoid spinning on persistent errors
                        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                        continue;
                    }
                },
            };

            info!("Accepted connection from {}", peer_addr);

            // Set TCP_NODELAY to disable Nagle's algorithm
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
            }

            let (read_half, write_half) = stream.into_split();
            match serve_lines(&server, BufReader::new(read_half), write_half, &mut shutdown).await {
                Ok(SessionEnd::Eof) => info!("Client {} disconnected", peer_addr),
                Ok(SessionEnd::Shutdown) => return Ok(()),
                Err(e) => warn!("Error while serving client {}: {}", peer_addr, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AdapterKind, Config};
    use crate::domains::tools::{ToolResult, ToolSet, text_result, tool_descriptor};
    use rmcp::model::{CallToolResult, JsonObject, Tool};
    use schemars::JsonSchema;
    use serde::Deserialize;
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Empty {}

    struct NoopTools;

    #[async_trait::async_trait]
    impl ToolSet for NoopTools {
        fn instructions(&self) -> &str {
            ""
        }

        fn tools(&self) -> Vec<Tool> {
            vec![tool_descriptor::<Empty>("noop", "Does nothing")]
        }

        async fn execute(&self, _name: &str, _arguments: JsonObject) -> ToolResult<CallToolResult> {
            Ok(text_result("ok"))
        }
    }

    #[tokio::test]
    async fn test_serves_sequential_connections() {
        let server = McpServer::new(Config::new(AdapterKind::GitLab), Arc::new(NoopTools)).unwrap();
        let transport = TcpTransport::new(TcpConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        });
        let listener = transport.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(TcpTransport::serve(listener, server, async {
            stop_rx.await.ok();
        }));

        for id in 1..=2 {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let line = format!(
                r#"{{"jsonrpc":"2.0","id":{id},"method":"tools/call","params":{{"name":"noop"}}}}"#
            );
            write_half.write_all(format!("{line}\n").as_bytes()).await.unwrap();

            let mut lines = BufReader::new(read_half).lines();
            let response: serde_json::Value =
                serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
            assert_eq!(response["id"], id);
            assert_eq!(response["result"]["content"][0]["text"], "ok");

            write_half.shutdown().await.unwrap();
        }

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
