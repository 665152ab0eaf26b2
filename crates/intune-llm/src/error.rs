//! Errors from the chat completion client.

use thiserror::Error;

/// Errors that can occur while talking to a chat completion endpoint.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LlmError {
    /// Non-success HTTP status not covered by a more specific variant.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// Credentials rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP 429.
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// HTTP 404 for the requested model.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API key variable is unset.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The body could not be understood, or contained no usable text.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not finish within the configured timeout.
    #[error("timeout")]
    Timeout,

    /// Transport-level failure from reqwest.
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

impl LlmError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Rate limits, timeouts, transport errors and 5xx statuses qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Timeout | LlmError::Http(_) => true,
            LlmError::Status { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            LlmError::AuthFailed(_)
            | LlmError::ModelNotFound(_)
            | LlmError::NotConfigured(_)
            | LlmError::InvalidResponse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status() {
        let err = LlmError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn display_rate_limited() {
        let err = LlmError::RateLimited {
            retry_after_ms: 1500,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 1500ms");
    }

    #[test]
    fn transient_classification() {
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::RateLimited { retry_after_ms: 1 }.is_transient());
        assert!(LlmError::Status { status: 503, body: String::new() }.is_transient());
        assert!(!LlmError::Status { status: 400, body: String::new() }.is_transient());
        assert!(!LlmError::AuthFailed("no".into()).is_transient());
        assert!(!LlmError::ModelNotFound("gpt-x".into()).is_transient());
        assert!(!LlmError::NotConfigured("key".into()).is_transient());
        assert!(!LlmError::InvalidResponse("empty".into()).is_transient());
    }
}
