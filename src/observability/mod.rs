//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bridge worker and dispatcher produce:
//!     → logging.rs (structured log events, one `job` span per frame)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Job trace IDs live in logs only, never on the wire

pub mod logging;
pub mod metrics;
