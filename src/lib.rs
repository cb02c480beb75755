//! # Nightscout Advisor
//!
//! Fetches glucose monitoring data from a Nightscout site, computes simple
//! statistics, and suggests therapy-setting adjustments with fixed-threshold
//! heuristics. The suggestions are illustrative, not medical advice.
//!
//! ## Modules
//!
//! - [`nightscout`]: Read-only Nightscout REST client
//! - [`analysis`]: Glucose statistics and the settings advisor
//! - [`mcp`]: MCP tools and resources over JSON-RPC
//! - [`api`]: HTTP transport with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nightscout_advisor::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NightscoutClient::new(
//!         NightscoutConfig::new("https://my-site.example.com").api_secret("secret"),
//!     )?;
//!
//!     let entries = client.get_entries(288).await?;
//!     let stats = calculate_statistics(&entries);
//!     println!("{} readings, average {:?}", stats.entry_count, stats.average_glucose);
//!
//!     let tools = NightscoutTools::new(Arc::new(client), Advisor::default());
//!     println!("{}", tools.suggest_settings(24).await);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod mcp;
pub mod nightscout;

pub use analysis::{
    analyze_settings, calculate_statistics, Advisor, SettingsReport, StatisticsSummary,
    Thresholds,
};

pub use nightscout::{
    hash_api_secret, NightscoutClient, NightscoutConfig, NightscoutError, ProfilePayload, Record,
};

pub use mcp::{McpServer, NightscoutTools, Resource, ToolError};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, Transport};
