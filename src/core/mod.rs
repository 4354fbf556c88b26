//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the adapter
//! processes, including error handling, configuration, process bootstrap,
//! the protocol handler and transport layer abstractions.

pub mod app;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{AdapterKind, Config};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
