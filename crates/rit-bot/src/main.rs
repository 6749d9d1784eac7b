//! RIT ALGO2 market maker - Entry Point

use anyhow::Result;
use clap::Parser;
use rit_mm::Preset;
use tracing::info;

/// Inventory-tiered market maker for the RIT ALGO2 case
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via RIT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Strategy preset: baseline, scalper, ladder, deep_ladder.
    /// Overrides the preset and any [strategy] table in the config file.
    #[arg(short, long)]
    preset: Option<Preset>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    rit_telemetry::init_logging()?;

    info!("Starting rit-bot v{}", env!("CARGO_PKG_VERSION"));

    let mut config = rit_bot::AppConfig::resolve(args.config)?;
    if let Some(preset) = args.preset {
        config.override_preset(preset);
    }
    info!(
        preset = %config.preset,
        base_url = %config.exchange.base_url,
        "Configuration loaded"
    );

    let app = rit_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
