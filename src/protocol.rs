//! Wire types for the n-gram service.
//!
//! The service speaks JSON over HTTP: a single request object in, an array of
//! `[gram, frequency]` pairs out.

use serde::{Deserialize, Serialize};

/// Request body sent to the grams endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Name of the corpus to query.
    pub corpus: String,
    /// N-gram order (1 = unigram, 2 = bigram, ...).
    pub ngram: u32,
    /// Maximum number of results.
    pub count: u64,
    /// Fold shifted characters onto their unshifted keys.
    pub noshift: bool,
    /// Drop grams containing whitespace.
    pub nospace: bool,
    /// Only return grams matching this pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// A single `[gram, frequency]` result.
///
/// Deserialized from a two-element JSON array rather than an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gram(pub String, pub f64);

impl Gram {
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Share of the corpus total, in [0, 1].
    pub fn frequency(&self) -> f64 {
        self.1
    }
}

/// Outcome of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// HTTP 200 with a parsed gram list, in service order.
    Grams(Vec<Gram>),
    /// Any other status. The body is kept as opaque bytes.
    Failure { status: u16, body: Vec<u8> },
}
