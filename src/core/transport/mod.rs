//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **TCP**: Raw TCP socket with JSON-RPC messages - feature: `tcp`
//!
//! Both speak line-delimited JSON-RPC 2.0 through the same session loop and
//! handle one message at a time.
//!
//! # Feature Flags
//!
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `tcp`: TCP transport - adds tokio/net

mod config;
mod error;
pub mod jsonrpc;
mod service;
pub mod session;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use service::TransportService;
pub use session::{SessionEnd, serve_lines, shutdown_signal};

// Re-export configs for convenience
#[cfg(feature = "tcp")]
pub use config::TcpConfig;
