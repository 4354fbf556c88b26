//! GitLab MCP adapter.

use mcp_api_adapters::core::{AdapterKind, app};

fn main() -> anyhow::Result<()> {
    app::main(AdapterKind::GitLab)
}
