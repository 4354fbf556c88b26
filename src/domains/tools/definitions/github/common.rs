//! Shared GitHub API plumbing for the repository tools.
//!
//! The contents endpoint returns either a single object (a file, symlink or
//! submodule) or an array (a directory listing) depending on the path, so the
//! response is modelled as an untagged enum and each tool insists on the
//! shape it needs.

use serde::Deserialize;
use tracing::debug;

use crate::domains::tools::client::{ApiClient, ApiError};

/// Branch, tag or commit used when the caller does not name one.
pub fn default_ref() -> String {
    "main".to_string()
}

/// Response of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentsResponse {
    /// A directory listing.
    Listing(Vec<ContentEntry>),
    /// A single item.
    Item(ContentItem),
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

/// A single content item.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Fetch repository content at `path` for `git_ref`.
///
/// An empty `path` addresses the repository root.
pub async fn fetch_contents(
    client: &ApiClient,
    owner: &str,
    repo: &str,
    path: &str,
    git_ref: &str,
) -> Result<ContentsResponse, ApiError> {
    let segments = ["repos", owner, repo, "contents"]
        .into_iter()
        .chain(path.split('/').filter(|s| !s.is_empty()));
    let url = client.endpoint(segments)?;

    debug!(owner, repo, path, git_ref, "fetching repository contents");
    client.get_json(url, &[("ref", git_ref)]).await
}
