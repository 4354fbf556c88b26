//! Tool catalog - selects the tool set an adapter process serves.
//!
//! Each process adapts exactly one backing service. The set is built from
//! configuration once at startup; a missing credential fails here, before
//! any transport is opened.

use std::sync::Arc;

use tracing::info;

use super::definitions::{BraveSearchTools, GitHubTools, GitLabTools};
use super::handlers::ToolSet;
use crate::core::config::{AdapterKind, Config};
use crate::core::error::Result;

/// Build the tool set for `config.adapter`.
pub fn build_tool_set(config: &Config) -> Result<Arc<dyn ToolSet>> {
    let tools: Arc<dyn ToolSet> = match config.adapter {
        AdapterKind::BraveSearch => Arc::new(BraveSearchTools::from_config(config)?),
        AdapterKind::GitHub => Arc::new(GitHubTools::from_config(config)?),
        AdapterKind::GitLab => Arc::new(GitLabTools::from_config(config)?),
    };

    info!(adapter = ?config.adapter, "Tool set ready");
    Ok(tools)
}
