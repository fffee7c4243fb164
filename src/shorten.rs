/// Request client for the shortening API
use crate::endpoint::ServiceEndpoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A URL to be shortened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenRequest {
    pub url: String,
}

impl ShortenRequest {
    pub fn new(url: impl Into<String>) -> ShortenRequest {
        ShortenRequest { url: url.into() }
    }
}

/// Why the service refused or failed to shorten a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidFormat,
    LimitExceeded,
    GeneralError,
}

impl FailureKind {
    /// Locale message key describing the failure
    pub fn message_key(self) -> &'static str {
        match self {
            FailureKind::InvalidFormat => "FailFormat",
            FailureKind::LimitExceeded => "FailLimit",
            FailureKind::GeneralError => "FailGeneral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenResult {
    Success { code: String },
    Failure(FailureKind),
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The request never produced a response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network failure: {0}")]
pub struct TransportError(pub String);

/// Outbound GET used by the request client
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// Map a transport outcome onto the result taxonomy
///
/// Only the status decides the branch; the body is the code on 200.
pub fn classify(outcome: Result<HttpResponse, TransportError>) -> ShortenResult {
    match outcome {
        Ok(HttpResponse { status: 200, body }) => ShortenResult::Success { code: body },
        Ok(HttpResponse { status: 403, .. }) => ShortenResult::Failure(FailureKind::InvalidFormat),
        Ok(HttpResponse { status: 409, .. }) => ShortenResult::Failure(FailureKind::LimitExceeded),
        Ok(_) | Err(_) => ShortenResult::Failure(FailureKind::GeneralError),
    }
}

/// Send one shortening request and classify the answer
pub async fn shorten<T: HttpTransport>(
    transport: &T,
    endpoint: &ServiceEndpoint,
    request: &ShortenRequest,
) -> ShortenResult {
    let url = endpoint.shorten_url(&request.url);
    log::debug!("Shortening {} via {}", request.url, url);

    let outcome = transport.get(&url).await;
    if let Err(e) = &outcome {
        log::debug!("Shorten request failed: {}", e);
    }

    let result = classify(outcome);
    log::debug!("Shorten result for {}: {:?}", request.url, result);
    result
}
