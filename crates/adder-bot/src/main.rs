//! Adder liquidity bot - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Liquidity-providing bot maintaining one resting order per side.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ADDER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    adder_telemetry::init_logging()?;

    info!("Starting adder bot v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var("ADDER_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = adder_bot::AppConfig::from_file(&config_path)?;
    info!(coin = %config.provide.coin, address = %config.user_address, "Configuration loaded");

    adder_bot::Application::new(config).run().await?;

    Ok(())
}
