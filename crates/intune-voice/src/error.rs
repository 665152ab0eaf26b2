//! Errors from the cloud speech clients.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VoiceError {
    /// The request never produced a response.
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The body could not be read or understood.
    #[error("{provider} response invalid: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

/// Result alias for the speech clients.
pub type Result<T> = std::result::Result<T, VoiceError>;
