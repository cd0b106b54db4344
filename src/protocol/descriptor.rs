//! Inbound job descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `applicationType` value that selects JSON-body dispatch.
pub const APPLICATION_JSON: &str = "application/json";

/// Multi-valued name → values mapping used for parameters and headers.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// One HTTP call requested by the controller.
///
/// Every field is optional on the wire; absent or `null` fields take their
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobDescriptor {
    #[serde(deserialize_with = "null_as_default")]
    pub method: String,

    /// Path appended to the configured base address.
    #[serde(deserialize_with = "null_as_default")]
    pub request_url: String,

    #[serde(deserialize_with = "null_as_default")]
    pub request_param: MultiMap,

    #[serde(deserialize_with = "null_as_default")]
    pub request_header: MultiMap,

    /// Opaque body for the JSON path; `null` when absent.
    pub json_request_param: Value,

    #[serde(deserialize_with = "null_as_default")]
    pub application_type: String,
}

impl JobDescriptor {
    /// Whether this job takes the JSON-body path.
    pub fn is_json(&self) -> bool {
        self.application_type == APPLICATION_JSON
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
