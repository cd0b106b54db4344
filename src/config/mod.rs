//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) ─┐
//! properties file ────┼→ loader.rs (parse, layer, apply CLI overrides)
//! CLI flags ──────────┘
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → controller section to the frame channel
//!     → target section to the HTTP invoker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, Overrides};
pub use schema::BridgeConfig;
pub use schema::ControllerConfig;
pub use schema::ObservabilityConfig;
pub use schema::TargetConfig;
