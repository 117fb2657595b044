//! Configuration management for api-request

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Name of the cookie holding the bearer token used by `authorize`.
pub const DEFAULT_TOKEN_COOKIE: &str = "token";

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URI prefix for every call made through one builder.
    pub api_root: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    pub token_cookie: String,
}

impl Config {
    pub fn new(api_root: impl Into<String>) -> Self {
        Config {
            api_root: api_root.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_root: String::new(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent: Some(format!("api-request/{}", crate::VERSION)),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, HttpMethod};

    #[test]
    fn method_parses_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("Delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("PATCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn method_serializes_upper_case() {
        let value = serde_json::to_value(HttpMethod::Put).expect("serialize");
        assert_eq!(value, serde_json::json!("PUT"));
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn config_new_keeps_defaults() {
        let config = Config::new("https://api.example.com");
        assert_eq!(config.api_root, "https://api.example.com");
        assert_eq!(config.token_cookie, "token");
        assert!(config
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.starts_with("api-request/")));
    }
}
