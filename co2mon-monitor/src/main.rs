//! Prints CO2 monitor readings as they are announced on D-Bus.
//!
//! Output is one `"<name> <value>"` line per reading on stdout; logs go to
//! stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use co2mon_monitor::{BusKind, DbusTransport, SignalListener};
use co2sight_common::{LogFormat, LoggingConfig};

/// Print CO2 monitor readings from D-Bus.
#[derive(Parser, Debug)]
#[command(name = "co2mon-monitor")]
#[command(about = "Prints CO2 monitor readings announced on D-Bus")]
#[command(version)]
struct Args {
    /// Bus the co2mon daemon emits on.
    #[arg(long, value_enum, default_value_t = BusKind::System)]
    bus: BusKind,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format (text or json).
    #[arg(long, default_value = "text", value_parser = parse_log_format)]
    log_format: LogFormat,
}

fn parse_log_format(s: &str) -> std::result::Result<LogFormat, String> {
    match s {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{}' (use text or json)", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    co2sight_common::init_tracing(&LoggingConfig {
        level: args.log_level.clone(),
        format: args.log_format,
    })
    .context("Failed to init tracing")?;

    let mut transport = DbusTransport::subscribe(args.bus)
        .await
        .with_context(|| format!("Failed to subscribe on the {:?} bus", args.bus))?;

    let mut listener = SignalListener::new(std::io::stdout());

    tokio::select! {
        result = listener.run(&mut transport) => {
            result.context("Listener stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    // Dropping the transport removes the match rule from the bus.
    drop(transport);

    Ok(())
}
