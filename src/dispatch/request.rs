//! Outbound request construction.
//!
//! # Responsibilities
//! - Join the base address and the job's `requestUrl`
//! - Materialize the query string (last value wins per name)
//! - Append every header value from the job
//!
//! # Design Decisions
//! - Headers append, query parameters overwrite: a header with several values
//!   is sent several times, a parameter only once with its last value
//! - The query path replaces any query already present in `requestUrl`
//! - The JSON path leaves the URL as given

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::dispatch::invoker::InvokeError;
use crate::dispatch::policy::DispatchPlan;
use crate::protocol::{JobDescriptor, APPLICATION_JSON};

/// A fully-resolved HTTP request ready for the invoker.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Build the outbound request for a job and its plan.
///
/// Returns `None` for unsupported plans, which never leave the bridge.
pub fn build_request(
    base_address: &str,
    job: &JobDescriptor,
    plan: DispatchPlan,
) -> Result<Option<OutboundRequest>, InvokeError> {
    let (method, query, body) = match plan {
        DispatchPlan::JsonBody { body } => (Method::POST, None, Some(body)),
        DispatchPlan::Query { method, query } => (method, Some(query), None),
        DispatchPlan::Unsupported { .. } => return Ok(None),
    };

    let target = format!("{}{}", base_address, job.request_url);
    let mut url = Url::parse(&target).map_err(|source| InvokeError::InvalidUrl {
        url: target.clone(),
        source,
    })?;

    if let Some(query) = query {
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
    }

    let mut headers = job_headers(job)?;
    if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    }

    Ok(Some(OutboundRequest {
        method,
        url,
        headers,
        body,
    }))
}

fn job_headers(job: &JobDescriptor) -> Result<HeaderMap, InvokeError> {
    let mut headers = HeaderMap::new();
    for (name, values) in &job.request_header {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| InvokeError::InvalidHeader(name.clone()))?;
        for value in values {
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| InvokeError::InvalidHeader(name.clone()))?;
            headers.append(header_name.clone(), header_value);
        }
    }
    Ok(headers)
}
