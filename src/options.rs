//! Request options and their merge rules
//!
//! Options accumulate across builder calls in layers. Every layering step in
//! this crate goes through one of the functions below, so the precedence of
//! a value can be read off here rather than from call order:
//!
//! 1. verb helpers build a fresh record (`method`, maybe `body`) and put it
//!    *under* the current options with [`RequestOptions::layered_under`];
//!    anything already set wins.
//! 2. `send` runs [`RequestOptions::with_default_headers`], which starts the
//!    header map from `Content-Type: application/json` and puts the current
//!    headers on top of it.
//! 3. `authorize` only touches the header map, creating it with the default
//!    content type first when it is missing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::HttpMethod;
use crate::error::{RequestError, Result};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Header name to value; names are matched exactly, as given by the caller.
pub type Headers = HashMap<String, String>;

/// Request body as stored in the options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Sent verbatim.
    Text(String),
    /// A structured value, serialized by the transport.
    Json(Value),
}

impl Body {
    /// Bytes to put on the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Body::Text(text) => Ok(text.clone().into_bytes()),
            Body::Json(value) => Ok(serde_json::to_vec(value)?),
        }
    }
}

/// Transport parameters accumulated before execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    /// Any other option, passed to the transport untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON object such as `{"headers": {"X-Foo": "1"}}`.
    pub fn from_json(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(RequestError::InvalidOptions(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| RequestError::InvalidOptions(e.to_string()))
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn extra(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Put `self` underneath `prior`: each field set in `prior` wins, and
    /// `extra` keys from `prior` replace keys of the same name.
    pub fn layered_under(self, prior: RequestOptions) -> RequestOptions {
        let mut extra = self.extra;
        extra.extend(prior.extra);
        RequestOptions {
            method: prior.method.or(self.method),
            headers: prior.headers.or(self.headers),
            body: prior.body.or(self.body),
            extra,
        }
    }

    /// Replace the header map with `Content-Type: application/json` overlaid
    /// by whatever headers are already present. Other fields are kept.
    pub fn with_default_headers(mut self) -> RequestOptions {
        let mut headers = default_headers();
        if let Some(existing) = self.headers.take() {
            headers.extend(existing);
        }
        self.headers = Some(headers);
        self
    }

    /// Header map, created with the default content type when absent.
    pub fn ensure_headers(&mut self) -> &mut Headers {
        self.headers.get_or_insert_with(default_headers)
    }
}

/// `{Content-Type: application/json}`
pub fn default_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prior_fields_win_when_layering() {
        let prior = RequestOptions::new()
            .method(HttpMethod::Delete)
            .extra("mode", json!("cors"));
        let merged = RequestOptions::new()
            .method(HttpMethod::Post)
            .body(Body::Text("x".into()))
            .extra("mode", json!("same-origin"))
            .extra("cache", json!("no-store"))
            .layered_under(prior);

        assert_eq!(merged.method, Some(HttpMethod::Delete));
        assert_eq!(merged.body, Some(Body::Text("x".into())));
        assert_eq!(merged.extra["mode"], json!("cors"));
        assert_eq!(merged.extra["cache"], json!("no-store"));
    }

    #[test]
    fn default_headers_yield_to_existing_ones() {
        let opts = RequestOptions::new()
            .header(CONTENT_TYPE, "text/plain")
            .header("X-Foo", "1")
            .with_default_headers();
        let headers = opts.headers.expect("headers");
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["X-Foo"], "1");
    }

    #[test]
    fn default_headers_created_when_missing() {
        let opts = RequestOptions::new().with_default_headers();
        assert_eq!(opts.headers, Some(default_headers()));
    }

    #[test]
    fn ensure_headers_keeps_existing_map() {
        let mut opts = RequestOptions::new().header("X-Foo", "1");
        opts.ensure_headers();
        let headers = opts.headers.expect("headers");
        assert_eq!(headers.len(), 1);
        assert!(!headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn from_json_splits_known_and_extra_keys() {
        let opts = RequestOptions::from_json(json!({
            "method": "PUT",
            "headers": {"X-Foo": "1"},
            "body": {"name": "a"},
            "credentials": "include"
        }))
        .expect("options");

        assert_eq!(opts.method, Some(HttpMethod::Put));
        assert_eq!(opts.headers.as_ref().expect("headers")["X-Foo"], "1");
        assert_eq!(opts.body, Some(Body::Json(json!({"name": "a"}))));
        assert_eq!(opts.extra["credentials"], json!("include"));
    }

    #[test]
    fn from_json_keeps_string_body_as_text() {
        let opts = RequestOptions::from_json(json!({"body": "raw"})).expect("options");
        assert_eq!(opts.body, Some(Body::Text("raw".into())));
    }

    #[test]
    fn from_json_rejects_non_objects_and_bad_methods() {
        assert!(matches!(
            RequestOptions::from_json(json!([1, 2])),
            Err(RequestError::InvalidOptions(_))
        ));
        assert!(matches!(
            RequestOptions::from_json(json!({"method": "PATCH"})),
            Err(RequestError::InvalidOptions(_))
        ));
    }

    #[test]
    fn json_body_serializes_for_the_wire() {
        let body = Body::Json(json!({"name": "a"}));
        assert_eq!(body.to_bytes().expect("bytes"), br#"{"name":"a"}"#.to_vec());
    }
}
