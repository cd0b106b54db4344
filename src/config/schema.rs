//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Port the controller listens on when the legacy properties file only
/// names a host.
pub const DEFAULT_CONTROLLER_PORT: u16 = 7777;

/// Root configuration for the tunnel bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Controller connection (the tunnel's far end).
    pub controller: ControllerConfig,

    /// Target HTTP service that jobs are executed against.
    pub target: TargetConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Controller connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Controller address (e.g., "10.0.0.5:7777").
    pub address: String,

    /// Maximum length of a single inbound frame in bytes.
    pub max_frame_bytes: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{}", DEFAULT_CONTROLLER_PORT),
            max_frame_bytes: 32 * 1024 * 1024, // 32MB
        }
    }
}

/// Target service configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    /// Base address every job's `requestUrl` is appended to.
    pub base_address: String,

    /// Optional total request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Maximum response body size buffered per job.
    pub max_body_bytes: usize,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_env_proxy: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_address: "http://127.0.0.1:8088".to_string(),
            request_timeout_secs: None,
            max_body_bytes: 16 * 1024 * 1024, // 16MB
            use_env_proxy: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
