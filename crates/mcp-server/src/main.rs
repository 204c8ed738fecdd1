//! Civic Assistant MCP Server
//!
//! Exposes the municipal assistant functions to MCP clients over stdio.
//!
//! ## Tools
//!
//! - `get_garbage_pickup_day` / `schedule_bulk_pickup` - garbage collection
//! - `get_available_park_days` / `book_park` - park reservations
//! - `start_new_form` / `get_form_fields` / `update_form_field` / `submit_form` - citizen forms
//! - `ingest_form` - turn analysed blank forms into a template
//! - `seed` - load the demo districts and reservations
//!
//! ## Usage
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "civic": {
//!       "command": "civic-mcp",
//!       "env": { "CIVIC_BACKEND": "file", "CIVIC_STORE_PATH": "/var/lib/civic/store.json" }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use civic_agent::{Agent, AgentConfig};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::sync::Arc;

mod tools;

use tools::CivicService;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .filter_module("aws_config", log::LevelFilter::Warn)
        .filter_module("aws_smithy_runtime", log::LevelFilter::Warn)
        .init();

    log::info!("Starting civic MCP server");

    let config = AgentConfig::load(None).context("Failed to load configuration")?;
    let agent = Agent::from_config(&config)
        .await
        .context("Failed to initialise backends")?;

    let service = CivicService::new(Arc::new(agent));
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Civic MCP server stopped");
    Ok(())
}
