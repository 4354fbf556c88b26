//! Line-delimited JSON-RPC session loop shared by the stream transports.
//!
//! One message is read, handled and answered before the next line is read.
//! The shutdown future is raced against each whole exchange, so a signal that
//! arrives during a tool call drops that call without writing a response.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::TransportResult;
use super::jsonrpc::JsonRpcResponse;
use crate::core::McpServer;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the input stream.
    Eof,
    /// The shutdown future completed.
    Shutdown,
}

/// Serve `reader` until EOF or until `shutdown` completes.
pub async fn serve_lines<R, W, F>(
    server: &McpServer,
    mut reader: R,
    mut writer: W,
    shutdown: F,
) -> TransportResult<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut buffer = Vec::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested, closing session");
                writer.flush().await.ok();
                return Ok(SessionEnd::Shutdown);
            }
            result = exchange(server, &mut reader, &mut buffer, &mut writer) => {
                if !result? {
                    info!("Input closed, ending session");
                    writer.flush().await?;
                    return Ok(SessionEnd::Eof);
                }
            }
        }
    }
}

/// Read one line and answer it. Returns `false` at EOF.
///
/// A line that is not valid UTF-8 is answered with a parse error like any
/// other unparsable message.
async fn exchange<R, W>(
    server: &McpServer,
    reader: &mut R,
    buffer: &mut Vec<u8>,
    writer: &mut W,
) -> TransportResult<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    buffer.clear();
    if reader.read_until(b'\n', buffer).await? == 0 {
        return Ok(false);
    }

    let response = match std::str::from_utf8(buffer) {
        Ok(line) => {
            let line = line.trim();
            if line.is_empty() {
                return Ok(true);
            }
            debug!(bytes = line.len(), "message received");
            server.handle_message(line).await
        }
        Err(e) => {
            warn!("Input line is not valid UTF-8: {}", e);
            Some(JsonRpcResponse::parse_error(format!("Parse error: {e}")))
        }
    };

    if let Some(response) = response {
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(true)
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
