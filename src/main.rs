mod gateway;

use anyhow::{Context, Result};
use clap::Parser;
use gateway::Gateway;
use sigtak_client::backoff::ReconnectConfig;
use sigtak_client::daemon::{DaemonClient, DaemonConfig};
use sigtak_client::udp::CotSender;
use sigtak_core::config::AppConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// SigTAK - signal-cli chat to TAK CoT gateway
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config from {:?}", args.config))?;
    config.validate().context("invalid configuration")?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("configuration loaded from {:?}", args.config);
    info!("daemon address: {}", config.daemon.addr());
    info!("CoT destination: {}", config.cot.destination);

    // Destination resolution failure is startup-fatal.
    let sender = CotSender::bind(&config.cot.destination)
        .await
        .context("failed to set up CoT sender")?;

    let daemon_config = DaemonConfig {
        addr: config.daemon.addr(),
        connect_timeout: Duration::from_secs(10),
        reconnect: ReconnectConfig::from(&config.reconnect),
    };
    let daemon = DaemonClient::connect(daemon_config)
        .await
        .context("failed to connect to signal-cli daemon")?;

    Gateway::new(daemon, sender, config.cot.stale_secs)
        .run()
        .await
}
