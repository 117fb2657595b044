//! Fluent request builder
//!
//! A [`RequestBuilder`] targets one API root. Configuration calls mutate the
//! pending route and options; `exec` issues the call and hands the parsed
//! body to the success callback or the error handler depending on the
//! body's `status` field.
//!
//! ```no_run
//! # async fn demo() -> api_request::Result<()> {
//! use std::sync::Arc;
//! use api_request::{Config, DocumentCookieJar, Handlers, RequestBuilder};
//!
//! let cookies = Arc::new(DocumentCookieJar::from_cookie_string("token=abc"));
//! let mut builder = RequestBuilder::from_config(Config::new("https://api.example.com"), cookies)?;
//! builder
//!     .authorize(None)
//!     .get("users", Some(Handlers::new(|users| println!("{}", users))))
//!     .resolve()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::auth::Auth;
use super::response::{is_success, Dispatch};
use super::{HttpTransport, Transport};
use crate::config::{Config, HttpMethod, DEFAULT_TOKEN_COOKIE};
use crate::cookie::{days, CookieStore};
use crate::error::Result;
use crate::options::{Body, RequestOptions, AUTHORIZATION};

/// Handler receiving the parsed response body.
pub type Callback<'a> = Box<dyn FnOnce(Value) + Send + 'a>;

/// Success callback plus optional error handler for one execution.
pub struct Handlers<'a> {
    on_success: Callback<'a>,
    on_error: Option<Callback<'a>>,
}

impl<'a> Handlers<'a> {
    pub fn new(on_success: impl FnOnce(Value) + Send + 'a) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_error: None,
        }
    }

    /// Handler for bodies whose `status` is not 0.
    pub fn on_error(mut self, on_error: impl FnOnce(Value) + Send + 'a) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    fn dispatch(self, body: Value) -> Dispatch {
        if is_success(&body) {
            (self.on_success)(body);
            Dispatch::Success
        } else if let Some(on_error) = self.on_error {
            on_error(body);
            Dispatch::Failure
        } else {
            Dispatch::Unhandled
        }
    }
}

impl fmt::Debug for Handlers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

/// POST payload. Text is sent as-is, anything else as JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Value(Value),
}

impl Payload {
    /// Serialize any value into a payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::from(serde_json::to_value(value)?))
    }

    fn into_body(self) -> Body {
        match self {
            Payload::Text(text) => Body::Text(text),
            Payload::Value(value) => Body::Text(value.to_string()),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Payload::Text(text),
            other => Payload::Value(other),
        }
    }
}

/// Result of a configuration call that may also execute.
///
/// Without handlers the builder comes back for more chaining; with handlers
/// the request is prepared and runs once [`Sent::resolve`] is awaited.
#[must_use = "a pending request does nothing unless resolved"]
pub enum Sent<'a> {
    Configured(&'a mut RequestBuilder),
    Pending(BoxFuture<'a, Result<Dispatch>>),
}

impl<'a> Sent<'a> {
    /// The builder, if nothing was executed.
    pub fn builder(self) -> Option<&'a mut RequestBuilder> {
        match self {
            Sent::Configured(builder) => Some(builder),
            Sent::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Sent::Pending(_))
    }

    /// Await the execution if one was started.
    pub async fn resolve(self) -> Result<Option<Dispatch>> {
        match self {
            Sent::Configured(_) => Ok(None),
            Sent::Pending(pending) => pending.await.map(Some),
        }
    }
}

impl fmt::Debug for Sent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sent::Configured(builder) => f.debug_tuple("Configured").field(builder).finish(),
            Sent::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// One in-progress API call.
pub struct RequestBuilder {
    api_root: String,
    route: String,
    options: RequestOptions,
    token_cookie: String,
    transport: Arc<dyn Transport>,
    cookies: Arc<dyn CookieStore>,
}

impl RequestBuilder {
    pub fn new(
        api_root: impl Into<String>,
        transport: Arc<dyn Transport>,
        cookies: Arc<dyn CookieStore>,
    ) -> Self {
        Self {
            api_root: api_root.into(),
            route: String::new(),
            options: RequestOptions::new(),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            transport,
            cookies,
        }
    }

    /// Builder backed by [`HttpTransport`] configured from `config`.
    pub fn from_config(config: Config, cookies: Arc<dyn CookieStore>) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let mut builder = Self::new(config.api_root, Arc::new(transport), cookies);
        builder.token_cookie = config.token_cookie;
        Ok(builder)
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// `{api_root}/{route}`
    pub fn url(&self) -> String {
        format!("{}/{}", self.api_root, self.route)
    }

    /// Replace all options. Nothing from the previous options survives.
    pub fn set_options(&mut self, options: RequestOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Set the `Authorization` header.
    ///
    /// `credentials` is used verbatim when given and non-empty. Otherwise the
    /// value is `Bearer <token cookie>`, which reads `Bearer false` when the
    /// cookie is absent.
    pub fn authorize(&mut self, credentials: Option<&str>) -> &mut Self {
        let value = match credentials.filter(|c| !c.is_empty()) {
            Some(credentials) => credentials.to_string(),
            None => {
                let token = self.get_cookie(&self.token_cookie);
                if token.is_none() {
                    log::warn!(
                        "cookie '{}' not found, sending placeholder bearer token",
                        self.token_cookie
                    );
                }
                Auth::bearer_from_cookie(token.as_deref())
            }
        };
        self.options
            .ensure_headers()
            .insert(AUTHORIZATION.to_string(), value);
        self
    }

    pub fn get<'a>(&'a mut self, route: &str, handlers: Option<Handlers<'a>>) -> Sent<'a> {
        self.layer(RequestOptions::new().method(HttpMethod::Get));
        self.send(route, handlers)
    }

    /// POST `payload`, JSON-encoded unless it is already text.
    pub fn post<'a>(
        &'a mut self,
        route: &str,
        payload: impl Into<Payload>,
        handlers: Option<Handlers<'a>>,
    ) -> Sent<'a> {
        let body = payload.into().into_body();
        self.layer(RequestOptions::new().method(HttpMethod::Post).body(body));
        self.send(route, handlers)
    }

    /// PUT `body`. The value is stored as given; encoding is left to the
    /// transport, unlike [`post`](Self::post).
    pub fn put<'a>(
        &'a mut self,
        route: &str,
        body: Value,
        handlers: Option<Handlers<'a>>,
    ) -> Sent<'a> {
        let body = match body {
            Value::String(text) => Body::Text(text),
            other => Body::Json(other),
        };
        self.layer(RequestOptions::new().method(HttpMethod::Put).body(body));
        self.send(route, handlers)
    }

    pub fn delete<'a>(&'a mut self, route: &str, handlers: Option<Handlers<'a>>) -> Sent<'a> {
        self.layer(RequestOptions::new().method(HttpMethod::Delete));
        self.send(route, handlers)
    }

    /// Set the route and fill in default headers; prepare an execution when
    /// `handlers` are given.
    ///
    /// The execution only happens when the returned [`Sent`] is resolved.
    /// Dropping it sends nothing and runs no handler.
    pub fn send<'a>(&'a mut self, route: &str, handlers: Option<Handlers<'a>>) -> Sent<'a> {
        self.route = route.to_string();
        let current = std::mem::take(&mut self.options);
        self.options = current.with_default_headers();

        match handlers {
            Some(handlers) => {
                let this: &'a Self = self;
                Sent::Pending(Box::pin(this.exec(handlers)))
            }
            None => Sent::Configured(self),
        }
    }

    /// Issue the request with the current route and options.
    ///
    /// Transport and JSON failures are returned as errors and no handler
    /// runs. Otherwise the body goes to exactly one of the handlers, or to
    /// none when it is a failure and no error handler was given.
    pub async fn exec(&self, handlers: Handlers<'_>) -> Result<Dispatch> {
        let url = self.url();
        let method = self.options.method.unwrap_or(HttpMethod::Get);
        log::debug!("{} {}", method, url);

        let response = self.transport.fetch(&url, &self.options).await?;
        let body = response.json()?;
        let outcome = handlers.dispatch(body);

        log::debug!("{} {} -> {} ({:?})", method, url, response.status, outcome);
        Ok(outcome)
    }

    /// Value of cookie `name`, `None` when absent.
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name)
    }

    /// Write cookie `name` expiring `days_till_expiration` days from now.
    pub fn set_cookie(&self, name: &str, value: &str, days_till_expiration: i64) {
        self.cookies.set(name, value, days(days_till_expiration));
    }

    fn layer(&mut self, defaults: RequestOptions) {
        let prior = std::mem::take(&mut self.options);
        self.options = defaults.layered_under(prior);
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("api_root", &self.api_root)
            .field("route", &self.route)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
