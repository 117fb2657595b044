//! HTTP client module
//!
//! The builder never talks to the network directly; it hands the final URL
//! and options to a [`Transport`]. [`HttpTransport`] is the reqwest-backed
//! implementation; tests and embedders can supply their own.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use url::Url;

use crate::config::Config;
use crate::error::{RequestError, Result};
use crate::options::RequestOptions;

pub mod auth;
pub mod request;
pub mod response;

pub use request::{Callback, Handlers, Payload, RequestBuilder, Sent};
pub use response::{Dispatch, TransportResponse};

/// Fetch-like capability: one URL plus options in, one response out.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<TransportResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder.build().map_err(RequestError::Http)?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<TransportResponse> {
        let url = Url::parse(url)
            .map_err(|e| RequestError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;
        let method = options.method.map(Method::from).unwrap_or(Method::GET);

        let mut request = self.client.request(method, url);

        if let Some(headers) = &options.headers {
            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }
        }

        if let Some(body) = &options.body {
            request = request.body(body.to_bytes()?);
        }

        if !options.extra.is_empty() {
            log::debug!(
                "ignoring options without an HTTP counterpart: {:?}",
                options.extra.keys().collect::<Vec<_>>()
            );
        }

        let response = request.send().await.map_err(RequestError::Http)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(RequestError::Http)?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_rejects_relative_url() {
        let transport = HttpTransport::new(&Config::default()).expect("transport");
        let err = transport
            .fetch("/users", &RequestOptions::new())
            .await
            .expect_err("relative url");
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }
}
