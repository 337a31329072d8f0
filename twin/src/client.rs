//! The twin client.
//!
//! [`TwinClient`] talks to one twin, its own, identified by a
//! [`ClientConfig`]. Paying another twin is still a request to the client's
//! own twin: the destination is resolved first through its public `/info`
//! document, and the payment is then submitted to the own twin which settles
//! it on the caller's behalf.
//!
//! Every call is independent. The client holds no mutable state, so it can be
//! shared freely across tasks.

use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::Method;
use rust_decimal::Decimal;
use url::Url;

use crate::body::ResponseBody;
use crate::classify::{Operation, classify, classify_binary};
use crate::config::ClientConfig;
use crate::constants::{
    API_KEY_PARAM, BINARY_CONTENT_TYPE, FETCH_PATH, IMPORT_PATH, INFO_PATH, JSON_CONTENT_TYPE,
};
use crate::error::Error;
use crate::info::InfoResolver;
use crate::request::{MicropayOptions, PaymentRequest, encode_component, paywall_url};
use crate::transport::{HttpRequest, HttpResponse, RequestBody, Transport};
use crate::types::{TwinHash, TwinInfo};

/// Client for a single twin.
#[derive(Clone)]
pub struct TwinClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for TwinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwinClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TwinClient {
    /// Creates a client for the twin described by `config`, sending through
    /// `transport`.
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    /// Creates a client sharing an existing transport.
    #[must_use]
    pub fn with_shared_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Returns the client's configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns a resolver for other twins' info documents, sharing this
    /// client's transport.
    #[must_use]
    pub fn resolver(&self) -> InfoResolver<'_> {
        InfoResolver::new(self.transport.as_ref())
    }

    /// Reads this twin's public info document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Twin`] on any non-2xx answer (`Auth` for 401/403,
    /// `Generic` otherwise), [`Error::Transport`] if no answer was obtained
    /// and [`Error::Decode`] if the document is malformed.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.info", skip_all, err)
    )]
    pub async fn info(&self) -> Result<TwinInfo, Error> {
        let body = self
            .send(Method::GET, INFO_PATH, None, Operation::Info)
            .await?;
        body.decode().map_err(|source| Error::Decode {
            context: "twin info document",
            source,
        })
    }

    /// Transfers `amount` tokens of `token_type` directly from this twin to
    /// the twin at `destination_url`.
    ///
    /// # Errors
    ///
    /// Fails if the destination cannot be resolved (see
    /// [`InfoResolver::fetch_info`]) or if this twin rejects the transfer.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.pay", skip(self), err)
    )]
    pub async fn pay(
        &self,
        destination_url: &str,
        token_type: &TwinHash,
        amount: Decimal,
    ) -> Result<ResponseBody, Error> {
        let destination = self.resolver().fetch_info(destination_url, None).await?;
        let request = PaymentRequest::transfer(&destination.address, token_type, amount);
        self.send_payment(request, Operation::Pay).await
    }

    /// Pays the paywall of the twin at `destination_url` with `amount` tokens
    /// of `token_type`, routing the payment through this twin.
    ///
    /// Performs two sequential round-trips: the destination's `/info`, then
    /// the payment itself. On success the body returned by this twin is
    /// passed through untouched.
    ///
    /// # Errors
    ///
    /// - Resolution failures as for [`InfoResolver::fetch_info`].
    /// - [`TwinError::MicropayAmountMismatch`](crate::TwinError::MicropayAmountMismatch)
    ///   or [`TwinError::MicropayTokenMismatch`](crate::TwinError::MicropayTokenMismatch)
    ///   when the paywall reports a disagreement.
    /// - [`TwinError::Micropay`](crate::TwinError::Micropay) for any other
    ///   rejection, [`TwinError::Auth`](crate::TwinError::Auth) for 401/403.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.micropay", skip(self, options), err)
    )]
    pub async fn micropay(
        &self,
        destination_url: &str,
        token_type: &TwinHash,
        amount: Decimal,
        options: MicropayOptions,
    ) -> Result<ResponseBody, Error> {
        let destination = self.resolver().fetch_info(destination_url, None).await?;
        self.submit_micropay(destination_url, &destination, token_type, amount, options)
            .await
    }

    /// Pays exactly what the destination's paywall advertises.
    ///
    /// Reads `targetPayType` and `targetPayQuantity` from the destination's
    /// info document and submits a micropay for them.
    ///
    /// # Errors
    ///
    /// As [`TwinClient::micropay`], plus [`Error::NoPaywall`] if the
    /// destination advertises no paywall.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.micropay_paywall", skip(self, options), err)
    )]
    pub async fn micropay_paywall(
        &self,
        destination_url: &str,
        options: MicropayOptions,
    ) -> Result<ResponseBody, Error> {
        let destination = self.resolver().fetch_info(destination_url, None).await?;
        let Some(paywall) = destination.paywall.clone() else {
            return Err(Error::NoPaywall {
                url: destination_url.to_owned(),
            });
        };
        self.submit_micropay(
            destination_url,
            &destination,
            &paywall.target_pay_type,
            paywall.target_pay_quantity,
            options,
        )
        .await
    }

    /// Downloads the binary file `id` from this twin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Twin`] on any non-2xx answer.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.fetch", skip(self), err)
    )]
    pub async fn fetch(&self, id: &TwinHash) -> Result<Vec<u8>, Error> {
        let path = format!("{FETCH_PATH}/{}", encode_component(id.as_str()));
        let request = self.http_request(Method::GET, &path, None)?;
        let response = self.transport.send(request).await?;
        Ok(classify_binary(response, Operation::Generic)?)
    }

    /// Uploads a binary file to this twin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Twin`] on any non-2xx answer, typically
    /// `400 { "error": ... }` for a file the twin refuses.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.import", skip_all, err)
    )]
    pub async fn import(&self, file: impl Into<Vec<u8>>) -> Result<ResponseBody, Error> {
        let file = file.into();

        #[cfg(feature = "telemetry")]
        tracing::debug!(len = file.len(), "uploading file");

        self.send(
            Method::POST,
            IMPORT_PATH,
            Some(RequestBody::Binary(file)),
            Operation::Generic,
        )
        .await
    }

    /// Sends an arbitrary authenticated request to this twin.
    ///
    /// `path` is relative to the base URL; a leading `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Twin`] on any non-2xx answer.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "twin.client.request", skip(self, body), err)
    )]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<ResponseBody, Error> {
        self.send(method, path, body, Operation::Generic).await
    }

    async fn submit_micropay(
        &self,
        destination_url: &str,
        destination: &TwinInfo,
        token_type: &TwinHash,
        amount: Decimal,
        options: MicropayOptions,
    ) -> Result<ResponseBody, Error> {
        let request = PaymentRequest::micropay(
            &destination.address,
            token_type,
            amount,
            &paywall_url(destination_url),
            options,
        );

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            destination = %destination.address,
            token_type = %token_type,
            amount = %amount,
            "submitting micropay"
        );

        self.send_payment(request, Operation::Micropay).await
    }

    async fn send_payment(
        &self,
        request: PaymentRequest,
        operation: Operation,
    ) -> Result<ResponseBody, Error> {
        self.send(request.method, &request.path, request.body, operation)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        operation: Operation,
    ) -> Result<ResponseBody, Error> {
        let request = self.http_request(method, path, body)?;
        let response: HttpResponse = self.transport.send(request).await?;
        Ok(classify(response, operation)?)
    }

    /// Builds a request against this twin: joins `path` under the base URL,
    /// attaches the API key and sets the content type.
    fn http_request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<HttpRequest, Error> {
        let url = self.endpoint(path)?;
        let mut request = HttpRequest::new(method, url);

        let content_type = match body {
            Some(RequestBody::Binary(_)) => BINARY_CONTENT_TYPE,
            _ => JSON_CONTENT_TYPE,
        };
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

        if let Some(key) = self.config.api_key() {
            request.query.push((API_KEY_PARAM.to_owned(), key.to_owned()));
        }
        request.body = body;
        Ok(request)
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.config
            .base_url()
            .join(path.trim_start_matches('/'))
            .map_err(|source| Error::UrlParse {
                context: "Failed to construct twin endpoint URL",
                source,
            })
    }
}
