//! Reverse tunnel bridge library.
//!
//! Holds one outbound connection to a controller, executes the HTTP jobs it
//! sends against a target service, and answers each job on the same
//! connection in order.

// Core subsystems
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod net;
pub mod protocol;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use bridge::Bridge;
pub use config::schema::BridgeConfig;
pub use dispatch::Dispatcher;
pub use lifecycle::Shutdown;
