//! The single sequential worker driving the tunnel.
//!
//! # Responsibilities
//! - Read a frame, decode it, dispatch it, write the reply
//! - Finish each job before reading the next frame
//! - Stop on controller EOF, channel failure or shutdown signal
//!
//! # Design Decisions
//! - Shutdown is only observed while waiting for a frame; an in-flight job
//!   is completed and answered first
//! - Undecodable frames are answered with a `decode` fault

use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::dispatch::Dispatcher;
use crate::net::{ChannelError, FrameChannel};
use crate::observability::metrics;
use crate::protocol::codec::{decode_descriptor, encode_envelope};
use crate::protocol::{CodecError, FaultKind, ResponseEnvelope};

/// Errors that end a bridge session abnormally.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("failed to encode reply: {0}")]
    Encode(#[from] CodecError),
}

/// Why a session ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ControllerClosed,
    Shutdown,
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub jobs: u64,
    pub faults: u64,
    pub stop: StopReason,
}

/// One controller session: a frame channel plus the dispatcher.
pub struct Bridge<R, W> {
    channel: FrameChannel<R, W>,
    dispatcher: Dispatcher,
}

impl<R, W> Bridge<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(channel: FrameChannel<R, W>, dispatcher: Dispatcher) -> Self {
        Self {
            channel,
            dispatcher,
        }
    }

    /// Serve jobs until the controller disconnects or shutdown is signalled.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<SessionSummary, BridgeError> {
        let mut jobs = 0u64;
        let mut faults = 0u64;

        loop {
            let frame = tokio::select! {
                frame = self.channel.read_frame() => frame?,
                _ = shutdown.recv() => {
                    tracing::info!(jobs, "Shutdown signal received, stopping bridge");
                    return Ok(SessionSummary { jobs, faults, stop: StopReason::Shutdown });
                }
            };

            let Some(frame) = frame else {
                tracing::info!(jobs, "Controller closed the connection");
                return Ok(SessionSummary {
                    jobs,
                    faults,
                    stop: StopReason::ControllerClosed,
                });
            };

            jobs += 1;
            metrics::record_frame_received();

            let span = tracing::info_span!("job", seq = jobs, trace_id = %Uuid::new_v4());
            let envelope = self.handle_frame(&frame).instrument(span.clone()).await;
            if envelope.is_fault() {
                faults += 1;
            }

            let reply = encode_envelope(&envelope)?;
            self.channel.write_frame(&reply).await?;
            span.in_scope(|| tracing::debug!(bytes = reply.len(), "Reply written"));
        }
    }

    /// Decode and dispatch one frame. Always yields exactly one envelope.
    pub async fn handle_frame(&self, frame: &str) -> ResponseEnvelope {
        let start = Instant::now();
        tracing::trace!(frame, "Frame received");

        match decode_descriptor(frame) {
            Ok(job) => self.dispatcher.dispatch(&job).await,
            Err(e) => {
                tracing::warn!(error = %e, bytes = frame.len(), "Undecodable frame");
                metrics::record_job("undecoded", FaultKind::Decode.as_str(), start);
                ResponseEnvelope::fault(FaultKind::Decode, e.to_string())
            }
        }
    }
}
