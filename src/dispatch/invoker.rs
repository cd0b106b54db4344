//! Outbound HTTP execution against the target service.
//!
//! # Responsibilities
//! - Own the shared HTTP client
//! - Send one request and buffer its whole response body
//! - Enforce the response body size limit
//!
//! # Design Decisions
//! - No timeout unless `request_timeout_secs` is configured
//! - HTTP status is not interpreted; 4xx/5xx are forwarded like 2xx
//! - Bodies over `max_body_bytes` are rejected, never truncated

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::TargetConfig;
use crate::dispatch::request::OutboundRequest;
use crate::protocol::FaultKind;

/// Failures while building or executing an outbound call.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid request header '{0}'")]
    InvalidHeader(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Send(#[source] reqwest::Error),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl InvokeError {
    /// Fault reported to the controller for this failure.
    pub fn fault_kind(&self) -> FaultKind {
        match self {
            InvokeError::InvalidUrl { .. } => FaultKind::InvalidUrl,
            InvokeError::InvalidHeader(_) | InvokeError::Client(_) | InvokeError::Send(_) => {
                FaultKind::Request
            }
            InvokeError::BodyTooLarge { .. } => FaultKind::BodyTooLarge,
            InvokeError::Body(_) => FaultKind::BodyRead,
        }
    }
}

/// Buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Executes outbound requests with one shared client.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: Client,
    base_address: String,
    max_body_bytes: usize,
}

impl HttpInvoker {
    /// Create an invoker for the configured target service.
    pub fn new(config: &TargetConfig) -> Result<Self, InvokeError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(InvokeError::Client)?;

        Ok(Self {
            client,
            base_address: config.base_address.clone(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Send the request and read the full response.
    pub async fn invoke(&self, request: OutboundRequest) -> Result<UpstreamResponse, InvokeError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(method = %method, url = %url, "Calling target service");

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let mut response = builder.send().await.map_err(InvokeError::Send)?;
        let status = response.status();
        let headers = response.headers().clone();

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(InvokeError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(InvokeError::Body)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(InvokeError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(status = %status, bytes = body.len(), "Target service responded");

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_kinds_by_stage() {
        let err = InvokeError::BodyTooLarge { limit: 1 };
        assert_eq!(err.fault_kind(), FaultKind::BodyTooLarge);
        assert_eq!(err.to_string(), "response body exceeds 1 bytes");

        let err = InvokeError::InvalidHeader("x y".into());
        assert_eq!(err.fault_kind(), FaultKind::Request);

        let source = url::Url::parse("nope").unwrap_err();
        let err = InvokeError::InvalidUrl {
            url: "nope".into(),
            source,
        };
        assert_eq!(err.fault_kind(), FaultKind::InvalidUrl);
    }

    #[test]
    fn builds_with_and_without_timeout() {
        let mut config = TargetConfig::default();
        let invoker = HttpInvoker::new(&config).unwrap();
        assert_eq!(invoker.base_address(), "http://127.0.0.1:8088");

        config.request_timeout_secs = Some(5);
        config.use_env_proxy = false;
        assert!(HttpInvoker::new(&config).is_ok());
    }
}
