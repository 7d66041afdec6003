//! `tekst mcp` command.

use crate::config::Settings;
use crate::mcp::McpServer;

pub async fn run_mcp(settings: &Settings) -> anyhow::Result<()> {
    let mut server = McpServer::new(settings);
    server.run().await
}
