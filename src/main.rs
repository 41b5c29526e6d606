use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use weekendcast::api::AppState;
use weekendcast::{OpenWeatherMapClient, ResponseCache, WeatherService, WeekendCastConfig, telemetry, web};

/// Weather proxy backend with weekend forecast summaries
#[derive(Debug, Parser)]
#[command(name = "weekendcast", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WeekendCastConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let _telemetry = telemetry::init(&config.logging)?;
    tracing::info!(version = weekendcast::VERSION, "Starting weekendcast");

    let client = OpenWeatherMapClient::new(&config.weather).context("Failed to create weather client")?;
    let cache = ResponseCache::new(config.cache.directory.clone(), config.cache.lifetime());
    let weather = WeatherService::new(Arc::new(client), cache);
    let state = Arc::new(AppState::new(
        weather,
        config.weekend.clone(),
        config.server.assets_dir.clone(),
    ));

    web::run(&config.server, state).await?;
    tracing::info!("Server stopped");
    Ok(())
}
