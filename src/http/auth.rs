//! Authorization header values

use base64::Engine;

/// Authorization helper
pub struct Auth;

impl Auth {
    /// Create bearer token header value
    pub fn bearer_token(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Bearer value for a token read from a cookie.
    ///
    /// An absent cookie renders as the literal `false`, giving
    /// `"Bearer false"`; the server is left to reject it.
    pub fn bearer_from_cookie(token: Option<&str>) -> String {
        Self::bearer_token(token.unwrap_or("false"))
    }

    /// Create basic auth header value, for use as an `authorize` override
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }
}
