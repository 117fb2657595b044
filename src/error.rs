//! Error handling for api-request

use thiserror::Error;

/// Main error type for api-request operations
///
/// Only transport-level problems end up here. A response whose `status`
/// field is non-zero is an application-level failure and is routed to the
/// error handler instead.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request options: {0}")]
    InvalidOptions(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for api-request operations
pub type Result<T> = std::result::Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::RequestError;

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("not json").expect_err("invalid");
        let err: RequestError = err.into();
        assert!(matches!(err, RequestError::Json(_)));
        assert!(err.to_string().starts_with("JSON parsing error"));
    }

    #[test]
    fn messages_carry_detail() {
        let err = RequestError::InvalidUrl("nope".to_string());
        assert_eq!(err.to_string(), "Invalid URL: nope");
    }
}
