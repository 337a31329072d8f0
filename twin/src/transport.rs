//! The HTTP capability a [`TwinClient`](crate::TwinClient) runs on.
//!
//! Requests and responses are plain data. A [`Transport`] executes an
//! [`HttpRequest`] and hands back whatever the server answered, including
//! non-2xx statuses: deciding what a status means is the classifier's job,
//! not the transport's. Timeouts, TLS and connection pooling live entirely
//! inside the transport implementation.

use http::{HeaderMap, Method, StatusCode};
use url::Url;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Raw bytes, sent with `Content-Type: application/octet-stream`.
    Binary(Vec<u8>),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL. Transports append `query` to any query it already has.
    pub url: Url,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Query parameters appended to `url`, percent-encoded by the transport.
    pub query: Vec<(String, String)>,
    /// Optional body.
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Returns the value of the query parameter `name`, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code as returned by the server.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given status and body and no headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a response whose body is the serialized JSON `value`.
    #[must_use]
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }
}

/// Failure to obtain any response at all: connection refused, TLS failure,
/// timeout and the like.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct TransportError {
    context: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    /// Wraps an underlying transport failure.
    pub fn new(
        context: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            context,
            source: source.into(),
        }
    }

    /// Returns the human-readable context of the failure.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }
}

/// Executes HTTP requests on behalf of a twin client.
///
/// Implementations must not turn non-2xx statuses into errors; only the
/// absence of a response is a [`TransportError`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the server's response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response could be obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
