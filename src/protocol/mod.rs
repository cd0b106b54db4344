//! Tunnel wire protocol.
//!
//! # Data Flow
//! ```text
//! inbound frame (one JSON line)
//!     → codec.rs (decode)
//!     → JobDescriptor (descriptor.rs)
//!     ... dispatch ...
//!     → ResponseEnvelope (envelope.rs)
//!     → codec.rs (encode)
//!     → outbound frame
//! ```
//!
//! # Design Decisions
//! - Replies pair with jobs by position; there is no request ID on the wire
//! - Every job produces exactly one envelope, faults included

pub mod codec;
pub mod descriptor;
pub mod envelope;

pub use codec::CodecError;
pub use descriptor::{JobDescriptor, MultiMap, APPLICATION_JSON};
pub use envelope::{BodyEncoding, Fault, FaultKind, ResponseEnvelope};
