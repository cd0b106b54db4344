//! Frame payload encoding.
//!
//! Frames are single-line JSON documents. `serde_json` emits compact output
//! with no embedded newlines and does not HTML-escape, so `<`, `>` and `&`
//! reach the controller verbatim.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::descriptor::JobDescriptor;
use crate::protocol::envelope::ResponseEnvelope;

/// Errors converting between frames and protocol types.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid frame JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("job frame must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Decode an inbound frame into a job descriptor.
///
/// Only a JSON object is a job. Serde would otherwise map an array onto the
/// descriptor's fields by position.
pub fn decode_descriptor(frame: &str) -> Result<JobDescriptor, CodecError> {
    match serde_json::from_str(frame)? {
        Value::Object(fields) => Ok(serde_json::from_value(Value::Object(fields))?),
        other => Err(CodecError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Encode a response envelope as a frame payload.
pub fn encode_envelope(envelope: &ResponseEnvelope) -> Result<String, CodecError> {
    Ok(serde_json::to_string(envelope)?)
}

/// Decode a frame payload back into a response envelope.
pub fn decode_envelope(frame: &str) -> Result<ResponseEnvelope, CodecError> {
    Ok(serde_json::from_str(frame)?)
}
