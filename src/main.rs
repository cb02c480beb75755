//! Nightscout MCP Server
//!
//! Run with: cargo run --bin nightscout-advisor
//!
//! # Configuration
//!
//! Environment variables:
//! - `NIGHTSCOUT_URL`: Nightscout site URL (required)
//! - `API_SECRET`: Nightscout API secret (optional)
//! - `NIGHTSCOUT_ADVISOR_HOST` / `NIGHTSCOUT_ADVISOR_PORT`: HTTP bind address
//! - `RUST_LOG`: Log filter (default: nightscout_advisor=info)

use anyhow::Context;
use clap::Parser;
use nightscout_advisor::{
    serve, Advisor, AppState, Config, McpServer, NightscoutClient, NightscoutTools, Transport,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nightscout-advisor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server exposing Nightscout data and therapy-setting suggestions")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve over HTTP instead of stdio
    #[arg(long)]
    http: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_from(args.config.as_deref())?;
    if args.http {
        config.server.transport = Transport::Http;
    }

    config.logging.init();

    tracing::info!("Nightscout Advisor v{}", env!("CARGO_PKG_VERSION"));

    let nightscout_config = config
        .nightscout_config()
        .context("Nightscout is not configured")?;
    let client = NightscoutClient::new(nightscout_config)?;
    tracing::info!("Nightscout site: {}", client.base_url());

    let tools = Arc::new(NightscoutTools::new(
        Arc::new(client),
        Advisor::new(config.thresholds),
    ));

    match config.server.transport {
        Transport::Stdio => McpServer::new(tools).run_stdio().await?,
        Transport::Http => serve(AppState::new(tools), &config.server).await?,
    }

    Ok(())
}
