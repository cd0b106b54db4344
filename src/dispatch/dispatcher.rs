//! Job dispatch: policy, request construction and invocation for one job.

use std::time::Instant;

use crate::dispatch::invoker::{HttpInvoker, InvokeError};
use crate::dispatch::policy::plan;
use crate::dispatch::request::build_request;
use crate::observability::metrics;
use crate::protocol::{FaultKind, JobDescriptor, ResponseEnvelope};

/// Turns job descriptors into response envelopes.
///
/// `dispatch` never fails: every error becomes a fault envelope so each job
/// still gets exactly one reply.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    invoker: HttpInvoker,
}

impl Dispatcher {
    pub fn new(invoker: HttpInvoker) -> Self {
        Self { invoker }
    }

    pub async fn dispatch(&self, job: &JobDescriptor) -> ResponseEnvelope {
        let start = Instant::now();
        let plan = plan(job);
        let shape = plan.label();

        let request = match build_request(self.invoker.base_address(), job, plan) {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::warn!(
                    method = %job.method,
                    request_url = %job.request_url,
                    "Unsupported request method, no call made"
                );
                metrics::record_job(shape, FaultKind::UnsupportedMethod.as_str(), start);
                return ResponseEnvelope::fault(
                    FaultKind::UnsupportedMethod,
                    format!("unsupported method '{}'", job.method),
                );
            }
            Err(e) => return self.failed(shape, e, start),
        };

        tracing::debug!(shape, method = %request.method, url = %request.url, "Dispatching job");

        match self.invoker.invoke(request).await {
            Ok(response) => {
                metrics::record_upstream_status(response.status.as_u16());
                metrics::record_job(shape, "ok", start);
                ResponseEnvelope::from_response(&response.headers, &response.body)
            }
            Err(e) => self.failed(shape, e, start),
        }
    }

    fn failed(&self, shape: &'static str, error: InvokeError, start: Instant) -> ResponseEnvelope {
        let kind = error.fault_kind();
        tracing::warn!(shape, fault = %kind, error = %error, "Job failed");
        metrics::record_job(shape, kind.as_str(), start);
        ResponseEnvelope::fault(kind, error.to_string())
    }
}
