//! Tool definitions module.
//!
//! One submodule per backing service. Each tool lives in its own file and
//! each service exposes a [`ToolSet`](super::ToolSet) owning its API client.

pub mod brave;
pub mod github;
pub mod gitlab;

pub use brave::{BraveSearchTools, BraveWebSearchParams, BraveWebSearchTool};
pub use github::{
    GetFileContentsParams, GetFileContentsTool, GitHubTools, ListDirectoryParams, ListDirectoryTool,
    SearchCodeParams, SearchCodeTool,
};
pub use gitlab::{GetMergeRequestParams, GetMergeRequestTool, GitLabTools};
