//! Bridge session subsystem.
//!
//! # Data Flow
//! ```text
//! Connected → AwaitFrame → Decoding → Dispatching → Invoking
//!           → Encoding → SendFrame → AwaitFrame …
//!
//! Exits: controller EOF | channel error | shutdown signal
//! ```

pub mod worker;

pub use worker::{Bridge, BridgeError, SessionSummary, StopReason};
