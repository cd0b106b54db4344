//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! JobDescriptor
//!     → policy.rs (JSON body vs. query GET/POST vs. unsupported)
//!     → request.rs (URL, query, headers, body)
//!     → invoker.rs (send, buffer response)
//!     → dispatcher.rs (ResponseEnvelope, faults included)
//! ```
//!
//! # Design Decisions
//! - The JSON flag wins over `method`: JSON jobs are always POST
//! - Policy is a pure function so it can be tested without a network
//! - One shared client, used by a single worker

pub mod dispatcher;
pub mod invoker;
pub mod policy;
pub mod request;

pub use dispatcher::Dispatcher;
pub use invoker::{HttpInvoker, InvokeError, UpstreamResponse};
pub use policy::{plan, DispatchPlan};
pub use request::{build_request, OutboundRequest};
