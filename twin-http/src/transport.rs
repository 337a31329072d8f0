//! A [`twin::Transport`] backed by `reqwest`.
//!
//! ## Features
//!
//! - Shares one pooled [`reqwest::Client`] across clones
//! - Supports optional per-request timeout and extra headers
//! - Integrates with `tracing` if the `telemetry` feature is enabled
//!
//! Non-2xx statuses are returned as ordinary responses; only failures to get
//! a response at all become [`TransportError`]s.

use std::time::Duration;

use http::HeaderMap;
use reqwest::Client;
use twin::{HttpRequest, HttpResponse, RequestBody, Transport, TransportError};

/// HTTP transport using a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a transport with a default [`reqwest::Client`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Attaches custom headers to every request.
    ///
    /// Headers set by the twin client itself, such as `Content-Type`, take
    /// precedence.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets a timeout for every request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the custom headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(
            name = "twin.http.send",
            skip_all,
            fields(method = %request.method, url = %request.url),
            err
        )
    )]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut headers = self.headers.clone();
        headers.extend(request.headers);

        let mut url = request.url;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut req = self.client.request(request.method, url).headers(headers);
        match request.body {
            Some(RequestBody::Json(value)) => req = req.json(&value),
            Some(RequestBody::Binary(bytes)) => req = req.body(bytes),
            None => {}
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let response = req
            .send()
            .await
            .map_err(|e| TransportError::new("Failed to send request", e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new("Failed to read response body", e))?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(status = status.as_u16(), len = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
