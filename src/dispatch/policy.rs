//! Dispatch policy: which request shape a job gets.
//!
//! 1. `applicationType == "application/json"` → POST with `jsonRequestParam`
//!    as the body, whatever `method` says.
//! 2. Otherwise `method` decides: `GET` and `POST` carry `requestParam` in
//!    the query string with no body; anything else is not sent.

use reqwest::Method;

use crate::protocol::{JobDescriptor, MultiMap};

/// Request shape chosen for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchPlan {
    /// POST carrying the serialized JSON value.
    JsonBody { body: String },
    /// GET or POST with parameters in the query string only.
    Query {
        method: Method,
        query: Vec<(String, String)>,
    },
    /// Method outside GET/POST on the query path.
    Unsupported { method: String },
}

impl DispatchPlan {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchPlan::JsonBody { .. } => "json",
            DispatchPlan::Query { method, .. } if *method == Method::GET => "query_get",
            DispatchPlan::Query { .. } => "query_post",
            DispatchPlan::Unsupported { .. } => "unsupported",
        }
    }
}

/// Apply the dispatch policy to a job.
pub fn plan(job: &JobDescriptor) -> DispatchPlan {
    if job.is_json() {
        return DispatchPlan::JsonBody {
            body: job.json_request_param.to_string(),
        };
    }

    match job.method.as_str() {
        "GET" => DispatchPlan::Query {
            method: Method::GET,
            query: last_value_wins(&job.request_param),
        },
        "POST" => DispatchPlan::Query {
            method: Method::POST,
            query: last_value_wins(&job.request_param),
        },
        other => DispatchPlan::Unsupported {
            method: other.to_string(),
        },
    }
}

/// Collapse multi-valued parameters to their last value, sorted by name.
/// Names with no values are dropped.
pub fn last_value_wins(params: &MultiMap) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(name, values)| values.last().map(|v| (name.clone(), v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::APPLICATION_JSON;
    use serde_json::json;

    fn job(method: &str, application_type: &str) -> JobDescriptor {
        JobDescriptor {
            method: method.into(),
            application_type: application_type.into(),
            json_request_param: json!({"k": "v"}),
            ..Default::default()
        }
    }

    #[test]
    fn json_type_overrides_method() {
        for method in ["GET", "POST", "DELETE", ""] {
            assert_eq!(
                plan(&job(method, APPLICATION_JSON)),
                DispatchPlan::JsonBody {
                    body: r#"{"k":"v"}"#.into()
                },
                "method {:?}",
                method
            );
        }
    }

    #[test]
    fn absent_json_param_serializes_as_null() {
        let mut j = job("POST", APPLICATION_JSON);
        j.json_request_param = serde_json::Value::Null;
        assert_eq!(plan(&j), DispatchPlan::JsonBody { body: "null".into() });
    }

    #[test]
    fn get_and_post_use_query() {
        let mut j = job("GET", "");
        j.request_param.insert("q".into(), vec!["1".into()]);
        assert_eq!(
            plan(&j),
            DispatchPlan::Query {
                method: Method::GET,
                query: vec![("q".into(), "1".into())]
            }
        );

        j.method = "POST".into();
        j.application_type = "application/x-www-form-urlencoded".into();
        assert!(matches!(
            plan(&j),
            DispatchPlan::Query { method, .. } if method == Method::POST
        ));
    }

    #[test]
    fn other_methods_are_unsupported() {
        for method in ["DELETE", "PUT", "get", ""] {
            assert_eq!(
                plan(&job(method, "")),
                DispatchPlan::Unsupported {
                    method: method.into()
                }
            );
        }
    }

    #[test]
    fn last_value_wins_per_name() {
        let mut params = MultiMap::new();
        params.insert("b".into(), vec!["1".into(), "2".into(), "3".into()]);
        params.insert("a".into(), vec!["x".into()]);
        params.insert("empty".into(), vec![]);

        assert_eq!(
            last_value_wins(&params),
            vec![("a".into(), "x".into()), ("b".into(), "3".into())]
        );
    }

    #[test]
    fn labels() {
        assert_eq!(plan(&job("GET", "")).label(), "query_get");
        assert_eq!(plan(&job("POST", "")).label(), "query_post");
        assert_eq!(plan(&job("GET", APPLICATION_JSON)).label(), "json");
        assert_eq!(plan(&job("PATCH", "")).label(), "unsupported");
    }
}
