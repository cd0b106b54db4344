//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (controller `host:port`, absolute target URL)
//! - Validate value ranges (limits > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("controller.address '{0}' is not a host:port pair")]
    ControllerAddress(String),

    #[error("target.base_address '{0}' is not an absolute http(s) URL")]
    BaseAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.controller.address) {
        errors.push(ValidationError::ControllerAddress(
            config.controller.address.clone(),
        ));
    }
    if config.controller.max_frame_bytes == 0 {
        errors.push(ValidationError::Zero("controller.max_frame_bytes"));
    }

    match Url::parse(&config.target.base_address) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::BaseAddress(
            config.target.base_address.clone(),
        )),
    }
    if config.target.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("target.max_body_bytes"));
    }
    if config.target.request_timeout_secs == Some(0) {
        errors.push(ValidationError::Zero("target.request_timeout_secs"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub(crate) fn is_host_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
