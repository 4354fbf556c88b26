//! Tools domain module.
//!
//! Tools are the executable functions an adapter process offers to MCP
//! clients. Each process serves the tool set of exactly one backing service.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, grouped per backing service
//! - `catalog.rs` - Picks the tool set for the configured adapter
//! - `registry.rs` - Immutable name to descriptor and validator table
//! - `dispatcher.rs` - Name lookup, argument validation and handler invocation
//! - `validation.rs` - Compiled JSON Schema argument checks
//! - `client.rs` - Authenticated HTTP client for the backing APIs
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file under the service's directory in `definitions/`
//! 2. Define the params struct (deriving `JsonSchema`), `to_tool()` and `execute()`
//! 3. Add it to the service's `ToolSet::tools` and `ToolSet::execute`

pub mod catalog;
pub mod client;
pub mod definitions;
pub mod dispatcher;
mod error;
mod handlers;
mod registry;
mod validation;

pub use catalog::build_tool_set;
pub use client::{ApiClient, ApiError, Auth, Page};
pub use dispatcher::Dispatcher;
pub use error::{ErrorKind, ToolError, ToolResult};
pub use handlers::*;
pub use registry::ToolRegistry;
pub use validation::ArgumentValidator;
