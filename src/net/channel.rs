//! Newline-delimited frame channel over the controller connection.
//!
//! # Responsibilities
//! - Dial the controller once at startup
//! - Read one frame (line) at a time, bounded by `max_frame_bytes`
//! - Write one frame followed by `\n`, flushing after each
//!
//! # Design Decisions
//! - No reconnect: a failed dial is fatal to the process
//! - Generic over the byte stream so tests can use in-memory pipes
//! - Frames are text; non-UTF-8 bytes are replaced rather than rejected so
//!   the job still gets a (decode fault) reply

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use thiserror::Error;

use crate::config::ControllerConfig;

/// Errors on the controller connection. All of them end the session.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to controller at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("inbound frame exceeds {limit} bytes")]
    FrameTooLong { limit: usize },

    #[error("outbound frame contains an embedded newline")]
    EmbeddedNewline,
}

/// A TCP-backed channel to the controller.
pub type TcpFrameChannel = FrameChannel<OwnedReadHalf, OwnedWriteHalf>;

/// Line-framed duplex channel.
pub struct FrameChannel<R, W> {
    reader: BufReader<R>,
    writer: W,
    max_frame_bytes: usize,
    buf: Vec<u8>,
}

impl FrameChannel<OwnedReadHalf, OwnedWriteHalf> {
    /// Dial the controller. Called exactly once per process.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, ChannelError> {
        tracing::info!(address = %config.address, "Connecting to controller");

        let stream = TcpStream::connect(&config.address)
            .await
            .map_err(|source| ChannelError::Connect {
                address: config.address.clone(),
                source,
            })?;
        stream.set_nodelay(true)?;

        tracing::info!(
            address = %config.address,
            local_addr = ?stream.local_addr().ok(),
            "Connected to controller"
        );

        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer, config.max_frame_bytes))
    }
}

impl<R, W> FrameChannel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, max_frame_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            max_frame_bytes,
            buf: Vec::new(),
        }
    }

    /// Read the next frame without its line terminator.
    ///
    /// Returns `Ok(None)` once the controller closes the connection. Blank
    /// lines are skipped. A trailing line without `\n` at end of stream is
    /// still returned as a frame.
    pub async fn read_frame(&mut self) -> Result<Option<String>, ChannelError> {
        loop {
            self.buf.clear();
            // Room for the payload plus a `\r\n` terminator.
            let limit = self.max_frame_bytes as u64 + 2;
            let n = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buf)
                .await?;

            if n == 0 {
                return Ok(None);
            }

            if self.buf.last() == Some(&b'\n') {
                self.buf.pop();
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
            }
            if self.buf.len() > self.max_frame_bytes {
                return Err(ChannelError::FrameTooLong {
                    limit: self.max_frame_bytes,
                });
            }

            let frame = String::from_utf8_lossy(&self.buf);
            if frame.trim().is_empty() {
                continue;
            }
            return Ok(Some(frame.into_owned()));
        }
    }

    /// Write one frame followed by `\n`.
    pub async fn write_frame(&mut self, payload: &str) -> Result<(), ChannelError> {
        if payload.contains('\n') {
            return Err(ChannelError::EmbeddedNewline);
        }
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
