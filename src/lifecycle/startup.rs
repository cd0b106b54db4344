//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics endpoint when enabled
//! - Build the HTTP invoker for the target service
//! - Dial the controller and hand the connection to the bridge worker
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including a refused connection
//! - The caller subscribes to shutdown before installing signal handlers and
//!   hands the receiver in, so an early signal is not lost

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::bridge::{Bridge, BridgeError, SessionSummary};
use crate::config::BridgeConfig;
use crate::dispatch::{Dispatcher, HttpInvoker, InvokeError};
use crate::net::{ChannelError, FrameChannel};
use crate::observability::metrics;

/// Errors that terminate the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to create HTTP client: {0}")]
    Invoker(#[from] InvokeError),

    #[error(transparent)]
    Connect(#[from] ChannelError),

    #[error("bridge session failed: {0}")]
    Session(#[from] BridgeError),
}

/// Run one bridge session from a validated configuration.
pub async fn run(
    config: BridgeConfig,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<SessionSummary, StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let invoker = HttpInvoker::new(&config.target)?;
    tracing::info!(
        base_address = %config.target.base_address,
        timeout_secs = ?config.target.request_timeout_secs,
        max_body_bytes = config.target.max_body_bytes,
        "Target service configured"
    );

    let channel = FrameChannel::connect(&config.controller).await?;
    let bridge = Bridge::new(channel, Dispatcher::new(invoker));

    Ok(bridge.run(shutdown_rx).await?)
}
