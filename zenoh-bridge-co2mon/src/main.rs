//! Zenoh bridge for CO2 monitor readings.
//!
//! Polls the co2mon data directory and publishes CO2 concentration and
//! ambient temperature to Zenoh, once per device heartbeat.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use co2sight_common::keyexpr::KeyExprBuilder;
use zenoh_bridge_co2mon::runner::join_task;
use zenoh_bridge_co2mon::{BridgeStatus, Co2monBridgeConfig, MetricBridge, ZenohSink};

const BRIDGE_NAME: &str = "co2mon";

/// Zenoh bridge for CO2 monitors.
#[derive(Parser, Debug)]
#[command(name = "zenoh-bridge-co2mon")]
#[command(about = "Publishes CO2 monitor readings to Zenoh")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format)
    #[arg(short, long, default_value = "co2mon.json5")]
    config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Override the sensor data directory.
    #[arg(long)]
    datadir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Co2monBridgeConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    if let Some(datadir) = args.datadir {
        config.co2mon.datadir = datadir;
        config.validate().context("Invalid --datadir")?;
    }

    co2sight_common::init_tracing(&config.logging.with_level_override(args.log_level.as_deref()))
        .context("Failed to init tracing")?;

    info!(bridge = BRIDGE_NAME, version = env!("CARGO_PKG_VERSION"), "Starting bridge");
    info!("Loaded configuration from {:?}", args.config);

    let session = co2sight_common::connect(&config.zenoh)
        .await
        .context("Failed to connect to Zenoh")?;

    let keys = KeyExprBuilder::with_prefix(config.co2mon.key_prefix.clone());
    let (sink, publisher) = ZenohSink::spawn(session.clone(), keys.clone(), config.serialization);

    let bridge = MetricBridge::from_config(&config, sink);
    let host = bridge.host().to_string();
    let metadata = serde_json::json!({
        "datadir": bridge.datadir().display().to_string(),
        "host": bridge.host(),
        "poll_interval_secs": config.co2mon.poll_interval_secs,
    });

    let poller = tokio::spawn(bridge.run(Duration::from_secs(config.co2mon.poll_interval_secs)));

    let running = BridgeStatus::running(BRIDGE_NAME, env!("CARGO_PKG_VERSION")).with_metadata(metadata);
    if let Err(e) = running.publish(&session, &keys).await {
        warn!(error = %e, "Failed to publish running status");
    }

    info!(
        subscribe = %keys.host_wildcard(&host),
        "CO2 bridge running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    poller.abort();
    join_task("poller", poller).await;
    // The poller owned the last sink clone; the publisher drains and exits.
    join_task("publisher", publisher).await;

    let offline = BridgeStatus::offline(BRIDGE_NAME, env!("CARGO_PKG_VERSION"));
    if let Err(e) = offline.publish(&session, &keys).await {
        warn!(error = %e, "Failed to publish offline status");
    }

    session
        .close()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to close Zenoh session: {}", e))?;
    info!("CO2 bridge stopped");

    Ok(())
}
