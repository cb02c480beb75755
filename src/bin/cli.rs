//! Nightscout Advisor CLI
//!
//! Diagnostic commands for checking a Nightscout site by hand:
//! - Verify connectivity
//! - Inspect device status telemetry
//! - Run the settings analysis
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use nightscout_advisor::config::generate_default_config;
use nightscout_advisor::mcp::RECORDS_PER_HOUR;
use nightscout_advisor::nightscout::LOOP_FIELD;
use nightscout_advisor::{Advisor, Config, NightscoutClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nightscout-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Diagnostics for a Nightscout site")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the site answers with entries and a profile
    Verify,

    /// Show the structure of the latest device status
    Inspect,

    /// Fetch recent data and print setting suggestions
    Suggest {
        /// Hours of history to analyze
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.logging.init();

    let result = match cli.command {
        Commands::Verify => verify(&config).await,
        Commands::Inspect => inspect(&config).await,
        Commands::Suggest { hours } => suggest(&config, hours).await,
        Commands::Config { output } => write_config(output),
    };

    if let Err(e) = result {
        eprintln!("Failed: {:#}", e);
        std::process::exit(1);
    }
}

fn connect(config: &Config) -> anyhow::Result<NightscoutClient> {
    let nightscout_config = config.nightscout_config()?;
    println!("Connecting to Nightscout at: {}", nightscout_config.base_url);
    Ok(NightscoutClient::new(nightscout_config)?)
}

async fn verify(config: &Config) -> anyhow::Result<()> {
    let client = connect(config)?;

    println!("Fetching entries...");
    let entries = client.get_entries(1).await.context("Connection failed")?;
    println!("Success! Retrieved {} entry.", entries.len());

    println!("Fetching profile...");
    client.get_profile().await.context("Connection failed")?;
    println!("Success! Retrieved profile.");

    println!("Connection verification successful.");
    Ok(())
}

async fn inspect(config: &Config) -> anyhow::Result<()> {
    let client = connect(config)?;

    println!("Fetching latest device status...");
    let statuses = client.get_device_status(1).await?;

    let Some(status) = statuses.first() else {
        println!("No device status found.");
        return Ok(());
    };

    let Some(fields) = status.as_object() else {
        println!("Device status is not an object: {}", status);
        return Ok(());
    };

    println!("Top level keys: {:?}", fields.keys().collect::<Vec<_>>());

    if let Some(loop_data) = status.get(LOOP_FIELD) {
        if let Some(fields) = loop_data.as_object() {
            println!("\n'loop' keys: {:?}", fields.keys().collect::<Vec<_>>());
        }
        println!(
            "\nSample 'loop' data: {}",
            serde_json::to_string_pretty(loop_data)?
        );
    }

    if let Some(fields) = status.get("openaps").and_then(|v| v.as_object()) {
        println!("\n'openaps' keys: {:?}", fields.keys().collect::<Vec<_>>());
    }

    Ok(())
}

async fn suggest(config: &Config, hours: u32) -> anyhow::Result<()> {
    let client = connect(config)?;
    let count = hours.saturating_mul(RECORDS_PER_HOUR);

    println!("Fetching last {}h data (approx {} entries)...", hours, count);
    let entries = client.get_entries(count).await?;
    let treatments = client.get_treatments(count).await?;
    let device_statuses = client.get_device_status(count).await?;
    let profile = client.get_profile().await?;

    println!(
        "Fetched {} entries and {} device statuses.",
        entries.len(),
        device_statuses.len()
    );

    println!("Running analysis...");
    let report = Advisor::new(config.thresholds).report(
        &profile,
        &entries,
        &treatments,
        &device_statuses,
    );

    println!("\nSuggestions:");
    println!("{}", serde_json::to_string_pretty(&report.suggestions)?);

    if !entries.is_empty() {
        println!("\nStatistics Debug:");
        println!("{}", serde_json::to_string_pretty(&report.statistics)?);
    }

    Ok(())
}

fn write_config(output: Option<PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();

    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote config to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
