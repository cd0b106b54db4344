//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → channel.rs (dial controller once)
//!     → Hand frames to the bridge worker
//!
//! Connection States:
//!     Connecting → Connected → (EOF | I/O error) → Closed
//!           ↘ ConnectFailed (fatal)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound connection per process
//! - Line framing; payloads never contain raw newlines
//! - Inbound frame size is bounded

pub mod channel;

pub use channel::{ChannelError, FrameChannel, TcpFrameChannel};
