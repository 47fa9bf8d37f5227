//! Errors raised while talking to the n-gram service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, bad URL).
    #[error("failed to reach n-gram service at {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered 200 but the body was not a gram list.
    #[error("service returned 200 with a malformed gram list")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
