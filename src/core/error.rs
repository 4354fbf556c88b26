//! Error types and handling for the adapter processes.
//!
//! This module defines the crate-level error type used during startup and at
//! the process boundary. Invocation failures use the narrower
//! [`ToolError`](crate::domains::tools::ToolError) taxonomy instead.

use thiserror::Error;

/// A specialized Result type for adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the adapter processes.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tool registry could not be built (duplicate names, unusable schemas).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
