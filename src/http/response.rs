//! HTTP response handling and dispatch

use serde_json::Value;

use crate::error::Result;

/// Response as seen by the builder: only the body matters for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code, informational only.
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Which handler, if any, received the parsed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `status` was 0; the callback ran.
    Success,
    /// `status` was not 0; the error handler ran.
    Failure,
    /// `status` was not 0 and no error handler was supplied.
    Unhandled,
}

/// True when the body carries the API's success marker, a numeric `status`
/// equal to zero. Missing, non-numeric and non-object cases are failures.
pub fn is_success(body: &Value) -> bool {
    body.get("status").and_then(Value::as_f64) == Some(0.0)
}
