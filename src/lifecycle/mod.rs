//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics (optional) → HTTP invoker → Dial controller → Worker
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Worker stops at next frame boundary → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The process runs until signalled or the controller disconnects
//! - No reconnect: losing the controller ends the process

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
