//! api-request - a fluent JSON API request builder
//!
//! This crate assembles calls against a single JSON API root, attaches
//! bearer authorization read from a cookie, and dispatches each parsed
//! response to a success or error handler based on its `status` field.

pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod logging;
pub mod options;

pub use config::{Config, HttpMethod};
pub use cookie::{CookieStore, DocumentCookieJar};
pub use error::{RequestError, Result};
pub use http::{
    Dispatch, Handlers, HttpTransport, Payload, RequestBuilder, Sent, Transport,
    TransportResponse,
};
pub use options::{Body, Headers, RequestOptions};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
