//! Reverse tunnel bridge.
//!
//! # Architecture Overview
//!
//! ```text
//!   Controller (behind NAT)                      Bridge                        Target service
//!  ┌──────────────────────┐   one TCP conn   ┌───────────────────────────┐   HTTP   ┌──────────┐
//!  │ job frame (JSON line)│ ───────────────▶ │ net::channel              │          │          │
//!  │                      │                  │   → protocol::codec       │          │          │
//!  │                      │                  │   → dispatch::policy      │ ───────▶ │          │
//!  │                      │                  │   → dispatch::invoker     │ ◀─────── │          │
//!  │ reply frame          │ ◀─────────────── │   → protocol::envelope    │          │          │
//!  └──────────────────────┘                  └───────────────────────────┘          └──────────┘
//! ```
//!
//! The bridge dials out; the controller never connects in. Jobs are handled
//! strictly one at a time and every job gets exactly one reply frame.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tunnel_bridge::config::{resolve_config, Overrides};
use tunnel_bridge::lifecycle::{signals, startup, Shutdown};
use tunnel_bridge::observability::logging;

#[derive(Parser)]
#[command(name = "tunnel-bridge")]
#[command(about = "Executes HTTP jobs received over an outbound tunnel connection", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Legacy `key = value` properties file (serviceAddress, ipAddr).
    #[arg(long)]
    properties: Option<PathBuf>,

    /// Controller address as host:port.
    #[arg(long)]
    controller: Option<String>,

    /// Target service base address, e.g. http://127.0.0.1:8088.
    #[arg(long)]
    ip_addr: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        controller: cli.controller,
        base_address: cli.ip_addr,
        log_level: cli.log_level,
    };

    let config = resolve_config(cli.config.as_deref(), cli.properties.as_deref(), &overrides)?;

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        controller = %config.controller.address,
        base_address = %config.target.base_address,
        config_file = ?cli.config,
        properties_file = ?cli.properties,
        "tunnel-bridge starting"
    );

    // Subscribe before the listener exists so no signal goes unobserved.
    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    signals::spawn_signal_listener(Arc::clone(&shutdown));

    match startup::run(config, shutdown_rx).await {
        Ok(summary) => {
            tracing::info!(
                jobs = summary.jobs,
                faults = summary.faults,
                stop = ?summary.stop,
                "Bridge stopped"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Bridge terminated");
            Err(e.into())
        }
    }
}
