//! Client module for the ngramq CLI.
//!
//! The client is a thin layer that:
//! - Validates a `QueryRequest`
//! - Posts it to the n-gram service through a `Transport`
//! - Parses 200 responses into grams and keeps everything else raw

pub mod http;

pub use http::HttpTransport;

use crate::error::ClientError;
use crate::protocol::{Gram, QueryRequest, QueryResponse};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Status code and body of a single HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Posts a request as JSON and returns whatever came back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: &QueryRequest) -> Result<RawResponse, ClientError>;

    /// Where requests go, for logs and error messages.
    fn endpoint(&self) -> &str;
}

/// Issues gram queries against the service. Holds no state between calls.
pub struct QueryClient<T> {
    transport: T,
}

impl<T: Transport> QueryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run one request/response cycle.
    ///
    /// A non-200 status is not an error: the body comes back untouched as
    /// `QueryResponse::Failure`. A 200 whose body does not parse is.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let raw = self.send(request).await?;

        if raw.status != 200 {
            warn!(status = raw.status, "n-gram service reported failure");
            return Ok(QueryResponse::Failure {
                status: raw.status,
                body: raw.body,
            });
        }

        let grams: Vec<Gram> =
            serde_json::from_slice(&raw.body).map_err(ClientError::MalformedResponse)?;
        debug!(entries = grams.len(), "received grams");
        Ok(QueryResponse::Grams(grams))
    }

    /// Post the request and hand back status and body without interpreting them.
    pub async fn send(&self, request: &QueryRequest) -> Result<RawResponse, ClientError> {
        validate(request)?;

        debug!(
            endpoint = self.transport.endpoint(),
            corpus = %request.corpus,
            ngram = request.ngram,
            count = request.count,
            regex = ?request.regex,
            "posting gram query"
        );

        self.transport.post_json(request).await
    }
}

fn validate(request: &QueryRequest) -> Result<(), ClientError> {
    if request.corpus.trim().is_empty() {
        return Err(ClientError::InvalidRequest(
            "corpus name must not be empty".to_string(),
        ));
    }
    if request.ngram == 0 {
        return Err(ClientError::InvalidRequest(
            "ngram must be at least 1".to_string(),
        ));
    }
    Ok(())
}
