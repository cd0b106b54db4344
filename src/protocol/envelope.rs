//! Outbound response envelopes.
//!
//! # Responsibilities
//! - Wrap an upstream response's headers and body for the controller
//! - Carry a fault indicator when a pipeline stage failed
//!
//! # Design Decisions
//! - Header names are rendered in canonical MIME form (`Content-Type`)
//! - Header keys serialize in sorted order
//! - UTF-8 bodies pass through untouched; anything else is base64 and
//!   flagged with `bodyEncoding`

use std::fmt;

use base64::Engine;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::protocol::descriptor::MultiMap;

/// How `myBody` is encoded when it is not plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
}

/// Stage at which a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Inbound frame was not a valid job descriptor.
    Decode,
    /// Method outside GET/POST on the query path; no call was made.
    UnsupportedMethod,
    /// Base address plus request URL did not form a valid URL.
    InvalidUrl,
    /// Request could not be built or sent, or got no response.
    Request,
    /// Response body exceeded the configured limit.
    BodyTooLarge,
    /// Response body failed mid-read.
    BodyRead,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Decode => "decode",
            FaultKind::UnsupportedMethod => "unsupported_method",
            FaultKind::InvalidUrl => "invalid_url",
            FaultKind::Request => "request",
            FaultKind::BodyTooLarge => "body_too_large",
            FaultKind::BodyRead => "body_read",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error indicator attached to an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

/// Reply to exactly one job descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub my_header: MultiMap,

    #[serde(default)]
    pub my_body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Fault>,
}

impl ResponseEnvelope {
    /// Build an envelope from an upstream response.
    pub fn from_response(headers: &HeaderMap, body: &[u8]) -> Self {
        let mut my_header = MultiMap::new();
        for (name, value) in headers.iter() {
            my_header
                .entry(canonical_header_key(name.as_str()))
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let (my_body, body_encoding) = match std::str::from_utf8(body) {
            Ok(text) => (text.to_string(), None),
            Err(_) => (
                base64::engine::general_purpose::STANDARD.encode(body),
                Some(BodyEncoding::Base64),
            ),
        };

        Self {
            my_header,
            my_body,
            body_encoding,
            error: None,
        }
    }

    /// An empty envelope carrying only a fault.
    pub fn fault(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            error: Some(Fault {
                kind,
                message: message.into(),
            }),
            ..Default::default()
        }
    }

    pub fn is_fault(&self) -> bool {
        self.error.is_some()
    }

    /// Raw body bytes, undoing any transfer encoding.
    pub fn body_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match self.body_encoding {
            Some(BodyEncoding::Base64) => {
                base64::engine::general_purpose::STANDARD.decode(&self.my_body)
            }
            None => Ok(self.my_body.as_bytes().to_vec()),
        }
    }
}

/// Canonical MIME form of a header name: first letter and every letter
/// after a hyphen upper-cased, the rest lower-cased.
///
/// Names containing bytes outside the HTTP token set are returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
