//! Tool invocation error taxonomy.
//!
//! Every failed invocation ends up as one of three kinds, which the transport
//! turns into a JSON-RPC error object.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::ApiError;

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Kind of an invocation failure, as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorKind {
    /// JSON-RPC error code for this kind.
    pub fn code(self) -> ErrorCode {
        match self {
            Self::MethodNotFound => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidParams => ErrorCode::INVALID_PARAMS,
            Self::InternalError => ErrorCode::INTERNAL_ERROR,
        }
    }
}

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not in the registry.
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    /// The arguments failed validation.
    #[error("Invalid arguments: {0}")]
    InvalidParams(String),

    /// The backing service call or the reshaping failed.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "method not found" error for the given tool name.
    pub fn method_not_found(name: impl Into<String>) -> Self {
        Self::MethodNotFound(name.into())
    }

    /// Create a new "invalid params" error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Self::InvalidParams(_) => ErrorKind::InvalidParams,
            Self::Internal(_) => ErrorKind::InternalError,
        }
    }
}

/// Backing-service failures are always internal errors; the message is kept.
impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let kind = err.kind();
        McpError::new(
            kind.code(),
            err.to_string(),
            Some(serde_json::json!({ "kind": kind })),
        )
    }
}
