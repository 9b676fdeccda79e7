use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use nanograph::config::{self, Config};
use nanograph::server;

#[derive(Parser)]
#[command(
    name = "nanograph",
    about = "Local HTTP telemetry server for live host and process metrics"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the listener to
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Ping probe timeout in milliseconds
    #[arg(long)]
    ping_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    server::run_server(config).await?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };

    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(timeout) = cli.ping_timeout_ms {
        config.ping.timeout_ms = timeout;
    }

    config
}
